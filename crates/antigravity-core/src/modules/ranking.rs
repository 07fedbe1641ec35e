//! Account ranking and filtering used for switching decisions.

use antigravity_types::{Account, SubscriptionTier};
use serde::{Deserialize, Serialize};

/// Number of accounts shown in the "top accounts" list.
pub const DEFAULT_BEST_LIMIT: usize = 5;

/// Tier filter applied to the account list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountFilter {
    #[default]
    All,
    Pro,
    Ultra,
    Free,
}

impl AccountFilter {
    pub fn matches(self, account: &Account) -> bool {
        match self {
            Self::All => true,
            Self::Pro => account.tier() == SubscriptionTier::Pro,
            Self::Ultra => account.tier() == SubscriptionTier::Ultra,
            Self::Free => account.tier() == SubscriptionTier::Free,
        }
    }
}

/// Per-filter counts over a (searched) account list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub pro: usize,
    pub ultra: usize,
    pub free: usize,
}

impl FilterCounts {
    pub fn from_accounts<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Self {
        let mut counts = Self::default();
        for account in accounts {
            counts.all += 1;
            match account.tier() {
                SubscriptionTier::Pro => counts.pro += 1,
                SubscriptionTier::Ultra => counts.ultra += 1,
                SubscriptionTier::Free => {},
            }
        }
        counts.free = counts.all - counts.pro - counts.ultra;
        counts
    }
}

/// Case-insensitive email search; an empty query matches everything.
pub fn matches_query(account: &Account, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || account.email.to_lowercase().contains(&query.to_lowercase())
}

/// Accounts matching both the search query and the tier filter, in input order.
pub fn filter_accounts<'a>(
    accounts: &'a [Account],
    query: &str,
    filter: AccountFilter,
) -> Vec<&'a Account> {
    accounts.iter().filter(|a| matches_query(a, query) && filter.matches(a)).collect()
}

/// Switch candidates ordered by their best remaining model quota.
///
/// Forbidden and disabled accounts are skipped. The sort is stable, so
/// accounts with equal quota keep the source order and the list does not
/// reshuffle between refreshes.
pub fn best_accounts(accounts: &[Account], limit: usize) -> Vec<&Account> {
    let mut candidates: Vec<&Account> =
        accounts.iter().filter(|a| !a.is_forbidden() && !a.disabled).collect();
    candidates.sort_by(|a, b| b.best_percentage().cmp(&a.best_percentage()));
    candidates.truncate(limit);
    candidates
}
