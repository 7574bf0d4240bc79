//! Contour extraction and terminus selection
//!
//! - Marching squares: iso-value polylines from a binary ice grid
//! - Selection: the longest polyline is taken as the terminus

mod marching_squares;
mod select;

pub use marching_squares::{trace_contours, ContourParams, ContourTracer};
pub use select::{select_longest, LENGTH_TIE_TOLERANCE};

use terminus_core::vector::Contour;

/// All contours traced from one grid at one iso-value.
///
/// Contours are kept in tracing order. The order carries no meaning but is
/// deterministic for a given grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourSet {
    iso_value: f64,
    contours: Vec<Contour>,
}

impl ContourSet {
    pub fn new(iso_value: f64, contours: Vec<Contour>) -> Self {
        Self { iso_value, contours }
    }

    pub fn iso_value(&self) -> f64 {
        self.iso_value
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter()
    }
}
