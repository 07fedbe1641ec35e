//! # Antigravity Types
//!
//! Core types, models, and error definitions shared by the Antigravity
//! companion crates.
//!
//! - **`error`** - Typed error hierarchy for accounts and configuration
//! - **`models`** - Domain models (Account, Quota, Config, Stats)
//!
//! ## Architecture Role
//!
//! `antigravity-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!                antigravity-types (this crate)
//!                        │
//!            ┌───────────┴───────────┐
//!            ▼                       ▼
//!     antigravity-core       antigravity-client
//!            │                       │
//!            └───────────┬───────────┘
//!                        ▼
//!                antigravity-agent
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for the manager's REST API
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and change detection

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{AccountError, ConfigError, TypedError};

// Re-export core model types
pub use models::{
    Account, AppConfig, DashboardStats, ModelQuota, QuotaData, RefreshStats, SubscriptionTier,
};
