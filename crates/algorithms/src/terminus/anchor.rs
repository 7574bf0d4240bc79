//! Baseline anchoring

use terminus_core::vector::{Baseline, Point};
use terminus_core::{Error, Result};

/// The two vertices of the reference baseline as `(start, end)`.
///
/// # Errors
/// `DegenerateBaseline` if both vertices coincide: endpoint matching needs
/// two distinct anchors.
pub fn baseline_endpoints(baseline: &Baseline) -> Result<(Point, Point)> {
    let (start, end) = (baseline.start(), baseline.end());
    if start == end {
        return Err(Error::DegenerateBaseline);
    }
    Ok((start, end))
}
