//! Error types for terminus tracking

use thiserror::Error;

/// Main error type for terminus tracking operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid vector data: {0}")]
    Format(String),

    #[error("No ice/non-ice boundary in the classified grid")]
    EmptyContourSet,

    #[error("No contour to select a terminus from")]
    NoTerminusCandidate,

    #[error("Terminus contour produced no sample points")]
    EmptySampling,

    #[error("Baseline start and end coincide")]
    DegenerateBaseline,

    #[error("Point cloud is empty")]
    EmptyPointCloud,

    #[error("{epoch} epoch failed during {stage}: {source}")]
    Stage {
        epoch: &'static str,
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error with the epoch and pipeline stage it occurred in
    pub fn in_stage(self, epoch: &'static str, stage: &'static str) -> Self {
        Error::Stage {
            epoch,
            stage,
            source: Box::new(self),
        }
    }

    /// Innermost error, looking through any stage context
    pub fn root(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Format(e.to_string())
    }
}

/// Result type alias for terminus tracking operations
pub type Result<T> = std::result::Result<T, Error>;
