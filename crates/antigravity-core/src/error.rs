//! Unified error types for Antigravity Core.

use antigravity_types::{AccountError, ConfigError, TypedError};
use serde::Serialize;
use thiserror::Error;

/// Main error type for all core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Account source reported a failure.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Configuration source reported a failure.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Transport or backend failure outside the typed domains.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Logging subsystem could not be initialized.
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TypedError> for AppError {
    fn from(err: TypedError) -> Self {
        match err {
            TypedError::Account(e) => Self::Account(e),
            TypedError::Config(e) => Self::Config(e),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for core operations.
pub type AppResult<T> = Result<T, AppError>;
