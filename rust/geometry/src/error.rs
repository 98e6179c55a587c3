use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during 2D geometry computation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid polyline: {0}")]
    InvalidPolyline(String),

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Divide failed: {0}")]
    DivideFailed(String),

    #[error("Merge failed: {0}")]
    MergeFailed(String),
}
