use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding gazetteer data
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid WKT: {0}")]
    InvalidWkt(String),

    #[error("Invalid shapefile: {0}")]
    InvalidShapefile(String),

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Unknown code: {0}")]
    UnknownCode(String),
}
