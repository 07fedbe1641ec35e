//! Account-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum AccountError {
    /// Account with given ID not found
    #[error("Account not found: {id}")]
    NotFound {
        /// Unique identifier of the missing account
        id: String,
    },

    /// Quota refresh for one account failed
    #[error("Quota refresh failed for {id}: {message}")]
    RefreshFailed {
        /// Unique identifier of the account
        id: String,
        /// Details about the refresh failure
        message: String,
    },

    /// Resync from the local store failed
    #[error("Account sync failed: {message}")]
    SyncFailed {
        /// Details about the sync failure
        message: String,
    },
}
