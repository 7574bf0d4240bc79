//! I/O for rasters and planar vector data
//!
//! These are the collaborators the tracking pipeline relies on but never
//! calls itself: rasters are loaded before classification starts, and
//! results are written after the retreat is measured.

mod geojson;
mod native;

pub use geojson::{read_baseline, write_contours, write_line, write_points};
pub use native::{read_geotiff, write_geotiff, GeoTiffOptions};
