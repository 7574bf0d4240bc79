//! terminus CLI - glacier terminus retreat between two epochs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use terminus_algorithms::contour::{trace_contours, ContourParams};
use terminus_algorithms::imagery::{classify_ice, ClassifyParams};
use terminus_algorithms::pipeline::{track_retreat, EpochResult, TerminusChange, TrackerParams};
use terminus_core::io::{read_baseline, read_geotiff, write_contours, write_geotiff, write_line, write_points, GeoTiffOptions};
use terminus_core::vector::Baseline;
use terminus_core::Raster;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "terminus")]
#[command(author, version, about = "Glacier terminus retreat measurement", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Classify a scene into ice (1) and water/land (0)
    Classify {
        /// Input scene
        input: PathBuf,
        /// Output GeoTIFF
        output: PathBuf,
        /// Threshold position within the value range
        #[arg(short, long, default_value = "0.25")]
        low_fraction: f64,
    },
    /// Trace ice/water boundaries of a scene as GeoJSON lines
    Contours {
        /// Input scene
        input: PathBuf,
        /// Output GeoJSON
        output: PathBuf,
        /// Threshold position within the value range
        #[arg(short, long, default_value = "0.25")]
        low_fraction: f64,
        /// Iso-value traced in the binary grid
        #[arg(short, long, default_value = "0.5")]
        iso_value: f64,
    },
    /// Measure terminus retreat between an early and a late scene
    Retreat {
        /// Scene of the later epoch
        #[arg(long)]
        late: PathBuf,
        /// Scene of the earlier epoch
        #[arg(long)]
        early: PathBuf,
        /// GeoJSON LineString drawn across the fjord
        #[arg(short, long)]
        baseline: PathBuf,
        /// JSON parameter file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Threshold position within the value range (overrides config)
        #[arg(short, long)]
        low_fraction: Option<f64>,
        /// Sampling cell size (overrides config; defaults to the scene's)
        #[arg(short = 's', long)]
        cell_size: Option<f64>,
        /// Directory for point clouds and chords of both epochs
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set default subscriber")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_scene(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<f64> = read_geotiff(path)
        .with_context(|| format!("Failed to read raster {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn read_line(path: &Path) -> Result<Baseline> {
    read_baseline(path).with_context(|| format!("Failed to read baseline {}", path.display()))
}

fn load_params(
    config: Option<&Path>,
    low_fraction: Option<f64>,
    cell_size: Option<f64>,
) -> Result<TrackerParams> {
    let mut params = match config {
        Some(path) => TrackerParams::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => TrackerParams::default(),
    };
    if let Some(fraction) = low_fraction {
        params.low_fraction = fraction;
    }
    if cell_size.is_some() {
        params.cell_size = cell_size;
    }
    Ok(params)
}

fn write_epoch(result: &EpochResult, dir: &Path) -> Result<()> {
    let points = dir.join(format!("{}_points.geojson", result.epoch));
    let chord = dir.join(format!("{}_chord.geojson", result.epoch));
    write_points(&result.cloud, &points).context("Failed to write point cloud")?;
    write_line(&result.endpoints.chord(), &chord).context("Failed to write chord")?;
    Ok(())
}

fn write_change(change: &TerminusChange, dir: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    write_epoch(&change.late, dir)?;
    write_epoch(&change.early, dir)?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => {
            let raster = read_scene(&input)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.3}, {:.3}) - ({:.3}, {:.3})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len() as f64
            );
        }

        Commands::Classify {
            input,
            output,
            low_fraction,
        } => {
            let scene = read_scene(&input)?;
            let start = Instant::now();
            let grid = classify_ice(&scene, &ClassifyParams { low_fraction })
                .context("Failed to classify scene")?;
            let elapsed = start.elapsed();
            info!(
                "Threshold {:.4}, {} ice cells",
                grid.threshold(),
                grid.ice_count()
            );

            let pb = spinner("Writing output...");
            write_geotiff(grid.grid(), &output, Some(GeoTiffOptions::default()))
                .context("Failed to write output")?;
            pb.finish_and_clear();
            done("Ice mask", &output, elapsed);
        }

        Commands::Contours {
            input,
            output,
            low_fraction,
            iso_value,
        } => {
            let scene = read_scene(&input)?;
            let start = Instant::now();
            let grid = classify_ice(&scene, &ClassifyParams { low_fraction })
                .context("Failed to classify scene")?;
            let contours = trace_contours(grid.grid(), &ContourParams { iso_value })
                .context("Failed to trace contours")?;
            let elapsed = start.elapsed();
            info!("{} contours", contours.len());

            write_contours(contours.contours(), &output).context("Failed to write output")?;
            done("Contours", &output, elapsed);
        }

        Commands::Retreat {
            late,
            early,
            baseline,
            config,
            low_fraction,
            cell_size,
            out_dir,
        } => {
            let params = load_params(config.as_deref(), low_fraction, cell_size)?;
            let late = read_scene(&late)?;
            let early = read_scene(&early)?;
            let baseline = read_line(&baseline)?;

            let start = Instant::now();
            let change = track_retreat(&late, &early, &baseline, &params)
                .context("Failed to measure terminus retreat")?;
            let elapsed = start.elapsed();

            if let Some(dir) = out_dir {
                write_change(&change, &dir)?;
                println!("Point clouds and chords saved to: {}", dir.display());
            }

            let m = &change.measurement;
            println!("Anchor: ({:.3}, {:.3})", m.anchor.x, m.anchor.y);
            println!("  Early front distance: {:.2}", m.dist_early);
            println!("  Late front distance: {:.2}", m.dist_late);
            println!("Terminus {} {:.2} m", m.direction(), m.retreat.abs());
            println!("  Processing time: {:.2?}", elapsed);
        }
    }

    Ok(())
}
