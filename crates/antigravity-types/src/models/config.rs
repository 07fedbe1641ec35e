//! Application-level configuration.
//!
//! Only the background-task fields are modeled; everything else the
//! manager stores is carried through untouched so a load/modify/save
//! cycle never drops settings this crate does not know about.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

const fn default_refresh_interval() -> i32 {
    15
}

const fn default_sync_interval() -> i32 {
    5
}

/// Application configuration snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Enable automatic quota refresh
    #[serde(default)]
    pub auto_refresh: bool,
    /// Refresh interval in minutes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: i32,
    /// Enable automatic sync of the active account
    #[serde(default)]
    pub auto_sync: bool,
    /// Sync interval in seconds
    #[serde(default = "default_sync_interval")]
    pub sync_interval: i32,
    /// Remaining settings owned by the manager (proxy, theme, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppConfig {
    /// Create default configuration.
    pub fn new() -> Self {
        Self {
            auto_refresh: false,
            refresh_interval: default_refresh_interval(),
            auto_sync: false,
            sync_interval: default_sync_interval(),
            extra: Map::new(),
        }
    }

    /// Quota refresh cadence; `None` when the interval is not positive.
    pub fn refresh_period(&self) -> Option<Duration> {
        positive_secs(i64::from(self.refresh_interval) * 60)
    }

    /// Account sync cadence; `None` when the interval is not positive.
    pub fn sync_period(&self) -> Option<Duration> {
        positive_secs(i64::from(self.sync_interval))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn positive_secs(secs: i64) -> Option<Duration> {
    u64::try_from(secs).ok().filter(|s| *s > 0).map(Duration::from_secs)
}
