//! Service-level errors for startup and runtime failures
//!
//! Request handling uses [`crate::handlers::ApiError`]; this type covers
//! everything around it: loading configuration, connecting to the database,
//! binding the listener.

use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Service error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration loaded but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Database connection or pool error
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(String),

    /// Book store error outside a request
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
