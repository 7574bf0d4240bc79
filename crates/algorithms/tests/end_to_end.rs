//! End-to-end terminus tracking on synthetic fjord scenes.
//!
//! Every scene is a 10x10 grid of 15 m cells anchored at (500000, 7000000).
//! Bright ice (DN 200) fills the top of the grid and dark water (DN 20) the
//! rest, so classification at a quarter of the range splits them cleanly.

use approx::assert_relative_eq;
use terminus_algorithms::pipeline::{process_epoch, track_retreat, Epoch, TrackerParams};
use terminus_algorithms::terminus::Direction;
use terminus_core::io::{read_baseline, read_geotiff, write_geotiff, write_line, write_points};
use terminus_core::raster::{GeoTransform, Raster};
use terminus_core::vector::{Baseline, Point};
use terminus_core::Error;

const CELL: f64 = 15.0;
const ORIGIN_X: f64 = 500_000.0;
const ORIGIN_Y: f64 = 7_000_000.0;

fn scene(ice: impl Fn(usize, usize) -> bool) -> Raster<f64> {
    let mut r = Raster::filled(10, 10, 20.0);
    r.set_transform(GeoTransform::new(ORIGIN_X, ORIGIN_Y, CELL, -CELL));
    for row in 0..10 {
        for col in 0..10 {
            if ice(row, col) {
                r.set(row, col, 200.0).unwrap();
            }
        }
    }
    r
}

/// Straight front: ice down to and including `last_row`
fn straight(last_row: usize) -> Raster<f64> {
    scene(|row, _| row <= last_row)
}

/// Planar position of a fractional pixel location
fn geo(col: f64, row: f64) -> Point {
    Point::new(ORIGIN_X + col * CELL, ORIGIN_Y - row * CELL)
}

/// Baseline running down the valley along the column-0 centers
fn valley_baseline() -> Baseline {
    Baseline::new(geo(0.5, 0.0), geo(0.5, 10.0))
}

// ---------------------------------------------------------------------------
// Retreat
// ---------------------------------------------------------------------------

#[test]
fn straight_front_retreat_two_cells() {
    let late = straight(6);
    let early = straight(8);

    let change = track_retreat(&late, &early, &valley_baseline(), &TrackerParams::default()).unwrap();

    // Early front sampled into row 9, late front into row 7
    assert!(change.early.cloud.iter().all(|p| (p.y - geo(0.0, 9.5).y).abs() < 1e-6));
    assert!(change.late.cloud.iter().all(|p| (p.y - geo(0.0, 7.5).y).abs() < 1e-6));
    assert_eq!(change.early.cloud.len(), 10);
    assert_eq!(change.late.cloud.len(), 10);

    // Both baseline vertices are farthest from the far column
    assert_eq!(change.early.endpoints.start, geo(9.5, 9.5));
    assert_eq!(change.early.endpoints.end, geo(9.5, 9.5));
    assert_eq!(change.measurement.anchor, geo(9.5, 9.5));

    assert_relative_eq!(change.measurement.dist_early, 0.0);
    assert_relative_eq!(change.measurement.dist_late, 2.0 * CELL, epsilon = 1e-6);
    assert_relative_eq!(change.retreat(), 30.0, epsilon = 1e-6);
    assert_eq!(change.measurement.direction(), Direction::Retreated);
}

#[test]
fn bowed_early_front_measures_advance() {
    // Early front bulges two extra rows into the fjord over columns 3-6
    let early = scene(|row, col| row <= 5 || (row <= 7 && (3..=6).contains(&col)));
    let late = straight(5);
    let baseline = Baseline::new(geo(0.5, 0.0), geo(9.5, 0.0));

    let change = track_retreat(&late, &early, &baseline, &TrackerParams::default()).unwrap();

    // Walls match the opposite ends of the flat part of the front
    assert_eq!(change.early.endpoints.start, geo(9.5, 6.5));
    assert_eq!(change.early.endpoints.end, geo(0.5, 6.5));
    assert_relative_eq!(change.measurement.anchor.x, geo(5.0, 6.5).x, epsilon = 1e-6);
    assert_relative_eq!(change.measurement.anchor.y, geo(5.0, 6.5).y, epsilon = 1e-6);

    assert_relative_eq!(change.measurement.dist_early, 1.5 * CELL, epsilon = 1e-6);
    assert_relative_eq!(change.measurement.dist_late, 0.5 * CELL, epsilon = 1e-6);
    assert_relative_eq!(change.retreat(), -15.0, epsilon = 1e-6);
    assert_eq!(change.measurement.direction(), Direction::Advanced);
}

#[test]
fn identical_scenes_are_unchanged() {
    let change = track_retreat(&straight(4), &straight(4), &valley_baseline(), &TrackerParams::default()).unwrap();
    assert_eq!(change.retreat(), 0.0);
    assert_eq!(change.measurement.direction(), Direction::Unchanged);
}

#[test]
fn late_chord_is_reported() {
    let baseline = Baseline::new(geo(0.5, 0.0), geo(9.5, 0.0));
    let change = track_retreat(&straight(6), &straight(8), &baseline, &TrackerParams::default()).unwrap();
    let chord = change.late_chord();
    assert_eq!(chord.start, geo(9.5, 7.5));
    assert_eq!(chord.end, geo(0.5, 7.5));
    assert_relative_eq!(chord.length(), 9.0 * CELL, epsilon = 1e-6);
}

#[test]
fn coarser_sampling_cells() {
    let params = TrackerParams {
        cell_size: Some(30.0),
        ..TrackerParams::default()
    };
    let result = process_epoch(Epoch::Late, &straight(6), &valley_baseline(), &params).unwrap();
    // 135 m of front over 30 m cells
    assert_eq!(result.cloud.len(), 5);
}

#[test]
fn deterministic_across_runs() {
    let early = scene(|row, col| row <= 5 || (row <= 7 && (3..=6).contains(&col)));
    let late = straight(5);
    let baseline = Baseline::new(geo(0.5, 0.0), geo(9.5, 0.0));
    let params = TrackerParams::default();

    let a = track_retreat(&late, &early, &baseline, &params).unwrap();
    let b = track_retreat(&late, &early, &baseline, &params).unwrap();
    assert_eq!(a.early.cloud, b.early.cloud);
    assert_eq!(a.early.terminus, b.early.terminus);
    assert_eq!(a.measurement, b.measurement);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn water_only_scene_fails_with_stage() {
    let water = Raster::<f64>::new(10, 10);
    let err = track_retreat(&straight(6), &water, &valley_baseline(), &TrackerParams::default()).unwrap_err();
    assert!(matches!(err.root(), Error::EmptyContourSet));
    match err {
        Error::Stage { epoch, stage, .. } => {
            assert_eq!(epoch, "early");
            assert_eq!(stage, "contour tracing");
        }
        other => panic!("expected stage context, got {other:?}"),
    }
}

#[test]
fn late_failure_is_reported_first() {
    let water = Raster::<f64>::new(10, 10);
    let err = track_retreat(&water, &water, &valley_baseline(), &TrackerParams::default()).unwrap_err();
    assert!(err.to_string().starts_with("late epoch"));
}

#[test]
fn invalid_fraction_fails_classification() {
    let params = TrackerParams {
        low_fraction: -0.1,
        ..TrackerParams::default()
    };
    let err = process_epoch(Epoch::Early, &straight(6), &valley_baseline(), &params).unwrap_err();
    assert!(matches!(err.root(), Error::InvalidParameter { name: "low_fraction", .. }));
}

// ---------------------------------------------------------------------------
// File round trip
// ---------------------------------------------------------------------------

#[test]
fn geotiff_and_geojson_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let late_path = dir.path().join("late.tif");
    let early_path = dir.path().join("early.tif");
    let baseline_path = dir.path().join("baseline.geojson");

    write_geotiff(&straight(6), &late_path, None).unwrap();
    write_geotiff(&straight(8), &early_path, None).unwrap();
    let (start, end) = (geo(0.5, 0.0), geo(0.5, 10.0));
    std::fs::write(
        &baseline_path,
        format!(
            r#"{{"type":"Feature","properties":{{}},"geometry":{{"type":"LineString","coordinates":[[{},{}],[{},{}]]}}}}"#,
            start.x, start.y, end.x, end.y
        ),
    )
    .unwrap();

    let late: Raster<f64> = read_geotiff(&late_path).unwrap();
    let early: Raster<f64> = read_geotiff(&early_path).unwrap();
    let baseline = read_baseline(&baseline_path).unwrap();
    assert_relative_eq!(late.cell_size(), CELL);

    let change = track_retreat(&late, &early, &baseline, &TrackerParams::default()).unwrap();
    assert_relative_eq!(change.retreat(), 30.0, epsilon = 1e-6);

    let points_path = dir.path().join("early_points.geojson");
    let chord_path = dir.path().join("early_chord.geojson");
    write_points(&change.early.cloud, &points_path).unwrap();
    write_line(&change.measurement.chord, &chord_path).unwrap();
    assert!(points_path.exists());
    assert!(chord_path.exists());
}
