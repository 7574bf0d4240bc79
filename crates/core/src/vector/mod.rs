//! Planar vector types
//!
//! All geometry lives in the raster's planar projection; no datum or
//! curvature correction is ever applied.

mod baseline;
mod cloud;
mod contour;
mod point;

pub use baseline::Baseline;
pub use cloud::PointCloud;
pub use contour::Contour;
pub use point::{Line, Point};
