//! Error types for the Antigravity client.

use antigravity_core::AppError;
use thiserror::Error;

/// Errors that can occur when using the Antigravity client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to establish connection to the server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// No Antigravity manager found at any discovery location.
    #[error("Server not found at any discovery location")]
    ServerNotFound,

    /// HTTP request failed.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an invalid or unparseable response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Admin key missing or rejected.
    #[error("Unauthorized ({0})")]
    Unauthorized(u16),

    /// Resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server returned 429 Too Many Requests.
    #[error("Rate limited (429): retry after {retry_after:?}s")]
    RateLimited {
        /// Seconds to wait before retrying, if provided by server.
        retry_after: Option<u64>,
    },

    /// Server returned a non-success status.
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// Gave up after exhausting the retry budget.
    #[error("Gave up after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        /// Failure seen on the final attempt.
        last_error: Box<ClientError>,
    },
}

impl ClientError {
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Calls without a typed domain surface as backend failures.
impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::Backend(err.to_string())
    }
}
