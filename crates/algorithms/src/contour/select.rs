//! Terminus selection among traced contours

use super::ContourSet;
use std::cmp::Ordering;
use terminus_core::vector::Contour;
use terminus_core::{Error, Result};

/// Relative difference below which two contour lengths count as equal
pub const LENGTH_TIE_TOLERANCE: f64 = 1e-9;

/// Pick the terminus: the longest contour of the set.
///
/// Contours whose length is within [`LENGTH_TIE_TOLERANCE`] of the maximum
/// are tied. Ties go to the contour with the lowest mean Y (the terminus is
/// taken to be the southernmost boundary), then to the earliest contour in
/// set order.
///
/// # Errors
/// `NoTerminusCandidate` if the set is empty.
pub fn select_longest(set: &ContourSet) -> Result<&Contour> {
    let longest = set
        .iter()
        .map(Contour::length)
        .fold(f64::NEG_INFINITY, f64::max);

    let tolerance = LENGTH_TIE_TOLERANCE * longest.abs().max(1.0);

    set.iter()
        .filter(|c| longest - c.length() <= tolerance)
        .reduce(|best, c| match compare_mean_y(c, best) {
            Ordering::Less => c,
            _ => best,
        })
        .ok_or(Error::NoTerminusCandidate)
}

fn compare_mean_y(a: &Contour, b: &Contour) -> Ordering {
    let ya = a.mean_y().unwrap_or(f64::INFINITY);
    let yb = b.mean_y().unwrap_or(f64::INFINITY);
    ya.partial_cmp(&yb).unwrap_or(Ordering::Equal)
}
