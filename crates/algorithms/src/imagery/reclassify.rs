//! Raster reclassification
//!
//! Reclassify raster values based on value ranges.

use terminus_core::raster::Raster;

/// A reclassification entry mapping an input range to an output value
#[derive(Debug, Clone, PartialEq)]
pub struct ReclassEntry {
    /// Minimum value (inclusive)
    pub min: f64,
    /// Maximum value (exclusive, except for the last class)
    pub max: f64,
    /// Output value for this class
    pub value: f64,
}

impl ReclassEntry {
    /// Create a new reclassification entry
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        Self { min, max, value }
    }
}

/// Parameters for reclassification
#[derive(Debug, Clone)]
pub struct ReclassifyParams {
    /// Reclassification table (must be sorted by min value)
    pub classes: Vec<ReclassEntry>,
    /// Value for cells that don't match any class
    pub default_value: f64,
}

impl Default for ReclassifyParams {
    fn default() -> Self {
        Self {
            classes: Vec::new(),
            default_value: f64::NAN,
        }
    }
}

/// Reclassify raster values based on a classification table.
///
/// The first entry with `min <= value < max` determines the output. The last
/// entry is closed at its upper bound so the raster maximum is never left
/// unclassified. No-data cells become NaN.
pub fn reclassify(raster: &Raster<f64>, params: &ReclassifyParams) -> Raster<f64> {
    let nodata = raster.nodata();
    let classes = &params.classes;

    let classify = |val: f64| -> f64 {
        if val.is_nan() || nodata.is_some_and(|nd| (val - nd).abs() < f64::EPSILON) {
            return f64::NAN;
        }

        if let Some(entry) = classes.iter().find(|e| val >= e.min && val < e.max) {
            return entry.value;
        }

        match classes.last() {
            Some(last) if val >= last.min && val <= last.max => last.value,
            _ => params.default_value,
        }
    };

    let (rows, cols) = raster.shape();
    let mut output = raster.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() = raster.data().mapv(classify);
    output
}
