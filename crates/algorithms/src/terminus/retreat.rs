//! Signed terminus displacement between two epochs

use std::fmt;

use super::endpoints::TerminusEndpointPair;
use terminus_core::vector::{Line, Point, PointCloud};
use terminus_core::{Error, Result};

/// Which way the terminus moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Retreated,
    Advanced,
    Unchanged,
}

impl Direction {
    fn of(retreat: f64) -> Self {
        if retreat > 0.0 {
            Direction::Retreated
        } else if retreat < 0.0 {
            Direction::Advanced
        } else {
            Direction::Unchanged
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Retreated => "retreated",
            Direction::Advanced => "advanced",
            Direction::Unchanged => "unchanged",
        };
        f.write_str(label)
    }
}

/// Everything derived while measuring the displacement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetreatMeasurement {
    /// Chord between the early epoch's endpoints
    pub chord: Line,
    /// Midpoint of the chord, fixed for both epochs
    pub anchor: Point,
    /// Shortest distance from the anchor to the early front
    pub dist_early: f64,
    /// Shortest distance from the anchor to the late front
    pub dist_late: f64,
    /// `dist_late - dist_early`; positive means retreat
    pub retreat: f64,
}

impl RetreatMeasurement {
    pub fn direction(&self) -> Direction {
        Direction::of(self.retreat)
    }
}

/// Shortest planar distance from `from` to any point of `cloud`.
///
/// One query per cloud, so a plain scan beats building a search tree.
///
/// # Errors
/// `EmptyPointCloud` if the cloud has no points.
pub fn nearest_distance(from: &Point, cloud: &PointCloud) -> Result<f64> {
    cloud
        .iter()
        .map(|p| p.dist_sq(from))
        .reduce(f64::min)
        .map(f64::sqrt)
        .ok_or(Error::EmptyPointCloud)
}

/// Measure the terminus displacement between the early and late epochs.
///
/// The anchor is the midpoint of the early endpoints' chord. The result is
/// the late front's distance from it minus the early front's: positive when
/// the ice has pulled back, negative when it has advanced.
///
/// # Errors
/// `EmptyPointCloud` if either cloud is empty.
pub fn measure_retreat(
    early_pair: &TerminusEndpointPair,
    early_cloud: &PointCloud,
    late_cloud: &PointCloud,
) -> Result<RetreatMeasurement> {
    let chord = early_pair.chord();
    let anchor = chord.midpoint();

    let dist_early = nearest_distance(&anchor, early_cloud)?;
    let dist_late = nearest_distance(&anchor, late_cloud)?;

    Ok(RetreatMeasurement {
        chord,
        anchor,
        dist_early,
        dist_late,
        retreat: dist_late - dist_early,
    })
}

/// Signed displacement only; see [`measure_retreat`].
pub fn retreat(early_pair: &TerminusEndpointPair, early_cloud: &PointCloud, late_cloud: &PointCloud) -> Result<f64> {
    measure_retreat(early_pair, early_cloud, late_cloud).map(|m| m.retreat)
}
