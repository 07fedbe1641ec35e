//! Quota aggregation over an account snapshot.
//!
//! Two policies coexist here and must stay distinct:
//!
//! - **Averages** skip accounts that have no entry for a model (and
//!   forbidden accounts). A missing entry is "unknown", and folding it in
//!   as 0 would drag the mean down.
//! - **Low-quota counting** treats a missing entry as 0%, so an account
//!   that has never reported Claude quota is flagged even if Gemini is
//!   healthy.
//!
//! The mismatch mirrors how the dashboard has always behaved; product
//! review has not decided whether to unify it.

use std::sync::Arc;

use antigravity_types::{Account, DashboardStats, SubscriptionTier};

/// Canonical key for the primary Gemini model ("model A").
pub const GEMINI_PRO_HIGH: &str = "gemini-3-pro-high";
/// Canonical key for the Gemini image model.
pub const GEMINI_PRO_IMAGE: &str = "gemini-3-pro-image";
/// Canonical key for the primary Claude model ("model B").
pub const CLAUDE_SONNET: &str = "claude-sonnet-4-5";

/// Models whose averages appear on the dashboard.
pub const TRACKED_MODELS: [&str; 3] = [GEMINI_PRO_HIGH, GEMINI_PRO_IMAGE, CLAUDE_SONNET];

/// Remaining percentage below which an account counts as low on quota.
pub const LOW_QUOTA_THRESHOLD: i32 = 20;

/// Rounded mean of the included percentages for `model`, 0 when none.
pub fn average_for(accounts: &[Account], model: &str) -> i32 {
    let included: Vec<i32> = accounts
        .iter()
        .filter(|a| !a.is_forbidden())
        .filter_map(|a| a.quota.as_ref()?.percentage_of(model))
        .collect();

    if included.is_empty() {
        return 0;
    }
    let sum: i64 = included.iter().map(|&p| i64::from(p)).sum();
    (sum as f64 / included.len() as f64).round() as i32
}

/// Whether an account should raise a low-quota alert.
///
/// Missing entries count as 0 here, unlike [`average_for`].
pub fn is_low_quota(account: &Account) -> bool {
    if account.is_forbidden() {
        return false;
    }
    let pct = |model: &str| {
        account.quota.as_ref().and_then(|q| q.percentage_of(model)).unwrap_or(0)
    };
    pct(GEMINI_PRO_HIGH) < LOW_QUOTA_THRESHOLD || pct(CLAUDE_SONNET) < LOW_QUOTA_THRESHOLD
}

/// Reduce an account list into dashboard statistics.
pub fn aggregate(accounts: &[Account]) -> DashboardStats {
    let mut stats = DashboardStats { total_accounts: accounts.len(), ..Default::default() };
    if accounts.is_empty() {
        return stats;
    }

    stats.avg_gemini_quota = average_for(accounts, GEMINI_PRO_HIGH);
    stats.avg_gemini_image_quota = average_for(accounts, GEMINI_PRO_IMAGE);
    stats.avg_claude_quota = average_for(accounts, CLAUDE_SONNET);
    stats.low_quota_count = accounts.iter().filter(|a| is_low_quota(a)).count();

    for account in accounts {
        match account.tier() {
            SubscriptionTier::Ultra => stats.ultra_count += 1,
            SubscriptionTier::Pro => stats.pro_count += 1,
            SubscriptionTier::Free => stats.free_count += 1,
        }
    }

    stats
}

/// Memoizes [`aggregate`] on the identity of the account snapshot.
///
/// Snapshots are immutable, so a new `Arc` is the only way the input can
/// change; handing the same `Arc` back returns the cached result.
#[derive(Debug, Default)]
pub struct QuotaAggregator {
    cached: Option<(Arc<[Account]>, DashboardStats)>,
}

impl QuotaAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for `accounts`, recomputed only when the snapshot changed.
    pub fn stats(&mut self, accounts: &Arc<[Account]>) -> &DashboardStats {
        let entry = match self.cached.take() {
            Some(entry) if Arc::ptr_eq(&entry.0, accounts) => entry,
            _ => {
                tracing::debug!("[Aggregator] Recomputing stats for {} account(s)", accounts.len());
                (Arc::clone(accounts), aggregate(accounts))
            },
        };
        &self.cached.insert(entry).1
    }

    /// Whether the cached stats were computed from this exact snapshot.
    pub fn is_cached_for(&self, accounts: &Arc<[Account]>) -> bool {
        self.cached.as_ref().is_some_and(|(snapshot, _)| Arc::ptr_eq(snapshot, accounts))
    }
}
