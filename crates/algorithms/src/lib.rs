//! # Terminus Algorithms
//!
//! Glacier terminus extraction and retreat measurement.
//!
//! ## Pipeline Stages
//!
//! - **imagery**: Range reclassification, ice / water-land thresholding
//! - **contour**: Marching squares boundary tracing, terminus selection
//! - **terminus**: Point sampling, endpoint location, signed retreat
//! - **pipeline**: Per-epoch chain and two-epoch comparison

pub mod contour;
pub mod imagery;
pub mod pipeline;
pub mod terminus;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::contour::{
        select_longest, trace_contours, ContourParams, ContourSet, ContourTracer,
    };
    pub use crate::imagery::{
        classify_ice, reclassify, BinaryGrid, ClassifyParams, IceClassifier, ReclassEntry,
        ReclassifyParams,
    };
    pub use crate::pipeline::{process_epoch, track_retreat, Epoch, EpochResult, TerminusChange, TrackerParams};
    pub use crate::terminus::{
        baseline_endpoints, locate_endpoints, measure_retreat, retreat, sample_contour, Direction,
        RetreatMeasurement, TerminusEndpointPair,
    };
    pub use terminus_core::prelude::*;
}
