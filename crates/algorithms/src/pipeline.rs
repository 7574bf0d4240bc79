//! Two-epoch terminus tracking
//!
//! Each epoch runs the same chain: classify, trace, select, sample, anchor,
//! locate. Only the final displacement step looks at both epochs at once.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::contour::{select_longest, trace_contours, ContourParams};
use crate::imagery::{classify_ice, ClassifyParams};
use crate::terminus::{
    baseline_endpoints, locate_endpoints, measure_retreat, sample_contour, RetreatMeasurement,
    TerminusEndpointPair,
};
use terminus_core::raster::Raster;
use terminus_core::vector::{Baseline, Contour, Line, PointCloud};
use terminus_core::{Error, Result};

/// Observation time point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Epoch {
    Early,
    Late,
}

impl Epoch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Epoch::Early => "early",
            Epoch::Late => "late",
        }
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracking parameters shared by both epochs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// Position of the ice threshold within each raster's value range
    pub low_fraction: f64,
    /// Value the boundary contour follows in the binary grid
    pub iso_value: f64,
    /// Cell size for sampling the terminus; the raster's own when unset
    pub cell_size: Option<f64>,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            low_fraction: ClassifyParams::default().low_fraction,
            iso_value: ContourParams::default().iso_value,
            cell_size: None,
        }
    }
}

impl TrackerParams {
    /// Load parameters from a JSON file; missing fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let params = serde_json::from_reader(BufReader::new(file))?;
        Ok(params)
    }
}

/// Output of the per-epoch chain
#[derive(Debug, Clone)]
pub struct EpochResult {
    pub epoch: Epoch,
    /// Threshold the raster was classified at
    pub threshold: f64,
    /// The source raster was constant
    pub degenerate_raster: bool,
    /// Number of contours the terminus was chosen from
    pub contour_count: usize,
    pub terminus: Contour,
    pub cloud: PointCloud,
    pub endpoints: TerminusEndpointPair,
}

/// Result of comparing the two epochs
#[derive(Debug, Clone)]
pub struct TerminusChange {
    pub early: EpochResult,
    pub late: EpochResult,
    /// Displacement measured from the early chord's midpoint
    pub measurement: RetreatMeasurement,
}

impl TerminusChange {
    /// Signed displacement, positive for retreat
    pub fn retreat(&self) -> f64 {
        self.measurement.retreat
    }

    /// Chord between the late epoch's endpoints
    pub fn late_chord(&self) -> Line {
        self.late.endpoints.chord()
    }
}

const CLASSIFICATION: &str = "classification";
const CONTOUR_TRACING: &str = "contour tracing";
const TERMINUS_SELECTION: &str = "terminus selection";
const POINT_SAMPLING: &str = "point sampling";
const BASELINE_ANCHORING: &str = "baseline anchoring";
const ENDPOINT_LOCATION: &str = "endpoint location";
const RETREAT_MEASUREMENT: &str = "retreat measurement";

/// Run classification through endpoint location for one epoch.
///
/// # Errors
/// Any stage failure, wrapped in [`Error::Stage`] naming the epoch and stage.
pub fn process_epoch(
    epoch: Epoch,
    raster: &Raster<f64>,
    baseline: &Baseline,
    params: &TrackerParams,
) -> Result<EpochResult> {
    let label = epoch.as_str();
    let stage = |name: &'static str| move |e: Error| e.in_stage(label, name);

    let classify_params = ClassifyParams {
        low_fraction: params.low_fraction,
    };
    let grid = classify_ice(raster, &classify_params).map_err(stage(CLASSIFICATION))?;
    debug!(%epoch, threshold = grid.threshold(), ice_cells = grid.ice_count(), "classified");

    let contour_params = ContourParams {
        iso_value: params.iso_value,
    };
    let contours = trace_contours(grid.grid(), &contour_params).map_err(stage(CONTOUR_TRACING))?;
    debug!(%epoch, count = contours.len(), "traced contours");

    let terminus = select_longest(&contours)
        .map_err(stage(TERMINUS_SELECTION))?
        .clone();
    debug!(%epoch, length = terminus.length(), vertices = terminus.len(), "selected terminus");

    let cell_size = params.cell_size.unwrap_or_else(|| raster.cell_size());
    let cloud = sample_contour(&terminus, raster.transform(), cell_size).map_err(stage(POINT_SAMPLING))?;

    let (start, end) = baseline_endpoints(baseline).map_err(stage(BASELINE_ANCHORING))?;
    let endpoints = locate_endpoints(&cloud, &start, &end).map_err(stage(ENDPOINT_LOCATION))?;

    info!(
        %epoch,
        points = cloud.len(),
        start = ?(endpoints.start.x, endpoints.start.y),
        end = ?(endpoints.end.x, endpoints.end.y),
        "terminus located"
    );

    Ok(EpochResult {
        epoch,
        threshold: grid.threshold(),
        degenerate_raster: grid.is_degenerate(),
        contour_count: contours.len(),
        terminus,
        cloud,
        endpoints,
    })
}

/// Measure the terminus displacement between a late and an early scene.
///
/// Both rasters must share the baseline's planar projection.
///
/// # Errors
/// The first failing stage, wrapped in [`Error::Stage`].
pub fn track_retreat(
    late: &Raster<f64>,
    early: &Raster<f64>,
    baseline: &Baseline,
    params: &TrackerParams,
) -> Result<TerminusChange> {
    let late = process_epoch(Epoch::Late, late, baseline, params)?;
    let early = process_epoch(Epoch::Early, early, baseline, params)?;

    let measurement = measure_retreat(&early.endpoints, &early.cloud, &late.cloud)
        .map_err(|e| e.in_stage("both", RETREAT_MEASUREMENT))?;

    info!(
        retreat = measurement.retreat,
        dist_early = measurement.dist_early,
        dist_late = measurement.dist_late,
        "terminus {}",
        measurement.direction()
    );

    Ok(TerminusChange {
        early,
        late,
        measurement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use terminus_core::vector::Point;
    use terminus_core::GeoTransform;

    /// Bright ice (200) in rows `0..=last_ice_row`, dark water (20) below
    fn scene(last_ice_row: usize) -> Raster<f64> {
        let mut r = Raster::filled(10, 10, 20.0);
        r.set_transform(GeoTransform::new(0.0, 100.0, 10.0, -10.0));
        for row in 0..=last_ice_row {
            for col in 0..10 {
                r.set(row, col, 200.0).unwrap();
            }
        }
        r
    }

    fn baseline() -> Baseline {
        Baseline::new(Point::new(5.0, 100.0), Point::new(5.0, 0.0))
    }

    #[test]
    fn test_process_epoch() {
        let result = process_epoch(Epoch::Late, &scene(6), &baseline(), &TrackerParams::default()).unwrap();
        assert_eq!(result.contour_count, 1);
        assert_eq!(result.cloud.len(), 10);
        assert!((result.threshold - 65.0).abs() < 1e-12);
        assert!(!result.degenerate_raster);
        // Front cells are row 7, centered at y = 25
        assert!(result.cloud.iter().all(|p| (p.y - 25.0).abs() < 1e-9));
    }

    #[test]
    fn test_constant_scene_fails_at_tracing() {
        let flat = Raster::filled(10, 10, 80.0);
        let err = process_epoch(Epoch::Early, &flat, &baseline(), &TrackerParams::default()).unwrap_err();
        assert!(matches!(err.root(), Error::EmptyContourSet));
        match err {
            Error::Stage { epoch, stage, .. } => {
                assert_eq!(epoch, "early");
                assert_eq!(stage, CONTOUR_TRACING);
            }
            other => panic!("expected stage context, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_baseline_reports_stage() {
        let p = Point::new(5.0, 5.0);
        let err = process_epoch(Epoch::Late, &scene(6), &Baseline::new(p, p), &TrackerParams::default())
            .unwrap_err();
        assert!(matches!(err.root(), Error::DegenerateBaseline));
        assert!(err.to_string().starts_with("late epoch failed during baseline anchoring"));
    }

    #[test]
    fn test_params_from_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{ "cell_size": 15.0 }"#).unwrap();

        let params = TrackerParams::from_json_file(&path).unwrap();
        assert_eq!(params.cell_size, Some(15.0));
        assert_eq!(params.low_fraction, 0.25);
        assert_eq!(params.iso_value, 0.5);
    }

    #[test]
    fn test_params_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, "{ low_fraction: }").unwrap();
        assert!(matches!(TrackerParams::from_json_file(&path), Err(Error::Format(_))));
    }
}
