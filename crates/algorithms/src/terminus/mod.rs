//! Terminus point sampling and displacement measurement
//!
//! - Sample: rasterize the terminus contour into a point cloud
//! - Anchor: the fixed baseline's two vertices
//! - Endpoints: farthest front point from each baseline vertex
//! - Retreat: signed distance change measured from the early chord midpoint

mod anchor;
mod endpoints;
mod retreat;
mod sample;

pub use anchor::baseline_endpoints;
pub use endpoints::{farthest_point, locate_endpoints, FarthestResult, TerminusEndpointPair};
pub use retreat::{measure_retreat, nearest_distance, retreat, Direction, RetreatMeasurement};
pub use sample::sample_contour;
