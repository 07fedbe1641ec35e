//! External collaborators consumed by the core.
//!
//! The core never talks to a backend directly; it is handed an
//! [`AccountSource`] and a [`ConfigSource`] at construction time.

use async_trait::async_trait;

use crate::error::AppResult;
use antigravity_types::{Account, AppConfig, QuotaData, RefreshStats};

/// Producer of account records and the quota operations behind them.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// All known accounts; may be cached or stale per source policy.
    async fn list_accounts(&self) -> AppResult<Vec<Account>>;

    /// The active account, if any.
    async fn current_account(&self) -> AppResult<Option<Account>>;

    /// Refresh the quota snapshot of a single account.
    async fn refresh_quota(&self, account_id: &str) -> AppResult<QuotaData>;

    /// Refresh quota for every account on the backend.
    async fn refresh_all_quotas(&self) -> AppResult<RefreshStats>;

    /// Resynchronize the active account's record from the local store.
    async fn sync_account_from_store(&self) -> AppResult<Option<Account>>;
}

/// Persistent configuration store.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Load the current configuration snapshot.
    async fn load_config(&self) -> AppResult<AppConfig>;

    /// Persist a configuration snapshot.
    async fn save_config(&self, config: &AppConfig) -> AppResult<()>;
}
