//! Ice / non-ice classification
//!
//! Splits a scene's digital numbers at a fraction of their range: ice is
//! bright, so it occupies the upper part of the scale while open water and
//! rock fall in the lower quarter.

use super::reclassify::{reclassify, ReclassEntry, ReclassifyParams};
use terminus_core::raster::Raster;
use terminus_core::{Algorithm, Error, Result};
use tracing::warn;

/// Cell value for water or land
pub const NON_ICE: u8 = 0;
/// Cell value for ice
pub const ICE: u8 = 1;

/// Parameters for ice classification
#[derive(Debug, Clone)]
pub struct ClassifyParams {
    /// Position of the threshold within the raster's value range, in `[0, 1]`
    pub low_fraction: f64,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self { low_fraction: 0.25 }
    }
}

/// A binary ice mask with the threshold it was cut at.
///
/// Shares extent and transform with the raster it was classified from.
#[derive(Debug, Clone)]
pub struct BinaryGrid {
    grid: Raster<u8>,
    threshold: f64,
    degenerate: bool,
}

impl BinaryGrid {
    pub fn grid(&self) -> &Raster<u8> {
        &self.grid
    }

    /// Value separating the two classes; cells at or above it are ice
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True when the source raster was constant, so only one class exists
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Number of ice cells
    pub fn ice_count(&self) -> usize {
        self.grid.data().iter().filter(|&&v| v == ICE).count()
    }
}

/// Raster classifier producing a [`BinaryGrid`]
#[derive(Debug, Clone, Default)]
pub struct IceClassifier;

impl Algorithm for IceClassifier {
    type Input = Raster<f64>;
    type Output = BinaryGrid;
    type Params = ClassifyParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Ice Classification"
    }

    fn description(&self) -> &'static str {
        "Threshold a scene into ice and water/land at a fraction of its value range"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        classify_ice(&input, &params)
    }
}

/// Threshold at `low_fraction` of the way from `min` to `max`
pub fn ice_threshold(min: f64, max: f64, low_fraction: f64) -> f64 {
    min + low_fraction * (max - min)
}

/// Classify a raster into ice (1) and water/land (0).
///
/// With `t = min + low_fraction * (max - min)`, cells in `[min, t)` become 0
/// and cells in `[t, max]` become 1. A constant raster puts every cell in
/// the ice class; the result is flagged degenerate and a warning is logged.
/// No-data cells are classified as water/land.
///
/// # Errors
/// `InvalidParameter` if `low_fraction` is outside `[0, 1]` or the raster
/// holds no valid cell.
pub fn classify_ice(raster: &Raster<f64>, params: &ClassifyParams) -> Result<BinaryGrid> {
    let fraction = params.low_fraction;
    if !(0.0..=1.0).contains(&fraction) {
        return Err(Error::InvalidParameter {
            name: "low_fraction",
            value: fraction.to_string(),
            reason: "must lie within [0, 1]".into(),
        });
    }

    let stats = raster.statistics();
    let (min, max) = match (stats.min, stats.max) {
        (Some(min), Some(max)) => (min, max),
        _ => {
            return Err(Error::InvalidParameter {
                name: "raster",
                value: format!("{}x{}", raster.cols(), raster.rows()),
                reason: "no valid cells to classify".into(),
            })
        }
    };

    let threshold = ice_threshold(min, max, fraction);
    let degenerate = min == max;
    if degenerate {
        warn!(value = min, "constant raster, every cell is classified as ice");
    }

    let table = ReclassifyParams {
        classes: vec![
            ReclassEntry::new(min, threshold, NON_ICE as f64),
            ReclassEntry::new(threshold, max, ICE as f64),
        ],
        default_value: NON_ICE as f64,
    };
    let classified = reclassify(raster, &table);

    let (rows, cols) = raster.shape();
    let mut grid = raster.with_same_meta::<u8>(rows, cols);
    *grid.data_mut() = classified
        .data()
        .mapv(|v| if v.is_nan() || v == NON_ICE as f64 { NON_ICE } else { ICE });

    Ok(BinaryGrid {
        grid,
        threshold,
        degenerate,
    })
}
