//! Core domain models for the Antigravity companion.
//!
//! This module contains all shared data structures used across the workspace.

mod account;
mod config;
mod quota;
mod stats;

// Re-export all models
pub use account::{Account, SubscriptionTier};
pub use config::AppConfig;
pub use quota::{clamp_percentage, ModelQuota, QuotaData};
pub use stats::{DashboardStats, RefreshStats};
