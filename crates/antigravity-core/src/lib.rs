//! # Antigravity Core
//!
//! Companion logic for the Antigravity account manager.
//!
//! ```text
//! antigravity-core/src/
//! ├── modules/
//! │   ├── aggregator.rs   # DashboardStats from an account snapshot
//! │   ├── ranking.rs      # best accounts, tier filter, search
//! │   ├── selection.rs    # selection and dialog state
//! │   ├── config_watch.rs # config polling over a watch channel
//! │   ├── source.rs       # AccountSource / ConfigSource traits
//! │   └── logger.rs       # tracing setup
//! └── scheduler/          # auto-refresh and auto-sync lanes
//! ```
//!
//! Backends plug in through [`modules::source`]; the HTTP implementation
//! lives in `antigravity-client`.

#![cfg_attr(test, allow(clippy::panic, clippy::float_cmp))]

pub mod error;
pub mod modules;
pub mod scheduler;

// Re-export commonly used types
pub use error::{AppError, AppResult};
pub use modules::aggregator::{aggregate, QuotaAggregator};
pub use modules::config_watch::{ConfigState, ConfigWatcher};
pub use modules::ranking::{best_accounts, filter_accounts, AccountFilter, FilterCounts};
pub use modules::selection::{SelectionState, ViewMode};
pub use modules::source::{AccountSource, ConfigSource};
pub use scheduler::{BackgroundScheduler, Lane, LaneEvent, LaneOutcome, LaneStatus, TimerId};
