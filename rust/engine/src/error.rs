use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing the map surface
#[derive(Error, Debug)]
pub enum Error {
    #[error("Model error: {0}")]
    Model(#[from] gazmap_model::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] gazmap_geometry::Error),

    /// Deployment misconfiguration (unknown layer type, service provider)
    /// rather than a user-correctable condition.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Surface error: {0}")]
    Surface(String),
}
