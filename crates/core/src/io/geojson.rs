//! GeoJSON exchange for baselines and tracking results
//!
//! Coordinates are written as-is in the rasters' planar projection. No
//! `crs` member is emitted.

use crate::error::{Error, Result};
use crate::vector::{Baseline, Contour, Line, Point, PointCloud};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// The subset of GeoJSON needed to locate a baseline
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonObject {
    FeatureCollection {
        #[serde(default)]
        features: Vec<GeoJsonObject>,
    },
    Feature {
        geometry: Option<Box<GeoJsonObject>>,
    },
    LineString {
        coordinates: Vec<Vec<f64>>,
    },
}

/// Read the reference baseline from a GeoJSON file.
///
/// Accepts a bare `LineString` geometry, a `Feature` wrapping one, or a
/// `FeatureCollection` whose first feature is a `LineString`. The first and
/// last vertices become the baseline's start and end.
pub fn read_baseline<P: AsRef<Path>>(path: P) -> Result<Baseline> {
    let file = File::open(path.as_ref())?;
    let doc: GeoJsonObject = serde_json::from_reader(BufReader::new(file))?;
    let vertices = line_vertices(doc)?;
    Baseline::from_vertices(&vertices)
}

fn line_vertices(doc: GeoJsonObject) -> Result<Vec<Point>> {
    match doc {
        GeoJsonObject::FeatureCollection { features } => {
            let first = features
                .into_iter()
                .next()
                .ok_or_else(|| Error::Format("FeatureCollection has no features".into()))?;
            line_vertices(first)
        }
        GeoJsonObject::Feature { geometry } => {
            let geometry = geometry.ok_or_else(|| Error::Format("Feature has no geometry".into()))?;
            line_vertices(*geometry)
        }
        GeoJsonObject::LineString { coordinates } => coordinates.iter().map(|c| position(c)).collect(),
    }
}

fn position(coords: &[f64]) -> Result<Point> {
    match coords {
        [x, y, ..] => Ok(Point::new(*x, *y)),
        _ => Err(Error::Format(format!("invalid position {:?}", coords))),
    }
}

fn coords(points: &[Point]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

fn write_collection<P: AsRef<Path>>(features: Vec<Value>, path: P) -> Result<()> {
    let doc = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(BufWriter::new(file), &doc)?;
    Ok(())
}

/// Persist a point cloud as a collection of `Point` features carrying their
/// coordinates as `x`/`y` properties
pub fn write_points<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> Result<()> {
    let features = cloud
        .iter()
        .map(|p| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [p.x, p.y] },
                "properties": { "x": p.x, "y": p.y },
            })
        })
        .collect();
    write_collection(features, path)
}

/// Persist a single line segment with its length
pub fn write_line<P: AsRef<Path>>(line: &Line, path: P) -> Result<()> {
    let feature = json!({
        "type": "Feature",
        "geometry": {
            "type": "LineString",
            "coordinates": coords(&[line.start, line.end]),
        },
        "properties": { "length": line.length() },
    });
    write_collection(vec![feature], path)
}

/// Persist traced contours with an `id` and `length` attribute each
pub fn write_contours<P: AsRef<Path>>(contours: &[Contour], path: P) -> Result<()> {
    let features = contours
        .iter()
        .enumerate()
        .map(|(id, c)| {
            json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": coords(c.points()) },
                "properties": { "id": id, "length": c.length(), "closed": c.is_closed() },
            })
        })
        .collect();
    write_collection(features, path)
}
