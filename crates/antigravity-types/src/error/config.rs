//! Errors raised by the remote configuration store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Store unreachable, or it refused the read.
    #[error("Config unavailable: {reason}")]
    Unavailable { reason: String },

    /// Store answered with a payload that is not an `AppConfig`.
    #[error("Config payload could not be parsed: {message}")]
    ParseError { message: String },

    /// Store rejected the save.
    #[error("Config save rejected: {message}")]
    WriteError { message: String },
}
