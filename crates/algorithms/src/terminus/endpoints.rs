//! Terminus endpoint location
//!
//! The baseline vertices sit on the valley walls. The ice front bows out
//! into the fjord, away from both walls, so each wall is matched with the
//! front point lying farthest from it.

use terminus_core::vector::{Line, Point, PointCloud};
use terminus_core::{Error, Result};

/// The two points anchoring one epoch's terminus segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminusEndpointPair {
    /// Match for the baseline's start vertex
    pub start: Point,
    /// Match for the baseline's end vertex
    pub end: Point,
}

impl TerminusEndpointPair {
    /// Chord joining the two endpoints
    pub fn chord(&self) -> Line {
        Line::new(self.start, self.end)
    }
}

/// A cloud point selected by a farthest-point query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarthestResult {
    pub point: Point,
    pub distance: f64,
    /// Position of the point in the cloud's enumeration order
    pub index: usize,
}

/// The cloud point at the greatest planar distance from `from`.
///
/// Exactly equal distances resolve to the lowest index.
///
/// # Errors
/// `EmptyPointCloud` if the cloud has no points.
pub fn farthest_point(cloud: &PointCloud, from: &Point) -> Result<FarthestResult> {
    let mut best: Option<(usize, f64)> = None;
    for (index, p) in cloud.iter().enumerate() {
        let d = p.dist_sq(from);
        if best.map_or(true, |(_, best_d)| d > best_d) {
            best = Some((index, d));
        }
    }

    let (index, dist_sq) = best.ok_or(Error::EmptyPointCloud)?;
    Ok(FarthestResult {
        point: cloud.points()[index],
        distance: dist_sq.sqrt(),
        index,
    })
}

/// Match both baseline vertices against the terminus point cloud.
///
/// # Errors
/// `EmptyPointCloud` if the cloud has no points.
pub fn locate_endpoints(cloud: &PointCloud, start: &Point, end: &Point) -> Result<TerminusEndpointPair> {
    Ok(TerminusEndpointPair {
        start: farthest_point(cloud, start)?.point,
        end: farthest_point(cloud, end)?.point,
    })
}
