//! Imagery classification
//!
//! - Reclassify: range-table reclassification
//! - Ice: two-class ice / water-land split at a fraction of the value range

mod ice;
mod reclassify;

pub use ice::{classify_ice, ice_threshold, BinaryGrid, ClassifyParams, IceClassifier, ICE, NON_ICE};
pub use reclassify::{reclassify, ReclassEntry, ReclassifyParams};
