//! Account model and related types.

use super::QuotaData;
use serde::{Deserialize, Serialize};

/// Subscription tier derived from the quota snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SubscriptionTier {
    /// Ultra subscription
    Ultra,
    /// Pro subscription
    Pro,
    /// Free or unknown tier
    Free,
}

impl SubscriptionTier {
    /// Classify a raw tier string reported by the backend.
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Free;
        };
        let lower = raw.to_lowercase();
        if lower.contains("ultra") {
            Self::Ultra
        } else if lower.contains("pro") {
            Self::Pro
        } else {
            Self::Free
        }
    }

    /// Short display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ultra => "ULTRA",
            Self::Pro => "PRO",
            Self::Free => "FREE",
        }
    }
}

/// Account record as reported by the account source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Unique identifier for the account
    pub id: String,
    /// Email address associated with the account
    pub email: String,
    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,
    /// Current quota snapshot, owned exclusively by this account
    #[serde(default)]
    pub quota: Option<QuotaData>,
    /// Whether the account is disabled globally
    #[serde(default)]
    pub disabled: bool,
    /// Whether the account is disabled for proxy use only
    #[serde(default)]
    pub proxy_disabled: bool,
    /// Timestamp when account was created
    #[serde(default)]
    pub created_at: i64,
    /// Timestamp when account was last used
    #[serde(default)]
    pub last_used: i64,
}

impl Account {
    /// Create a new account with the given ID and email.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
            quota: None,
            disabled: false,
            proxy_disabled: false,
            created_at: now,
            last_used: now,
        }
    }

    /// Builder-style helper used when assembling fixtures and API payloads.
    pub fn with_quota(mut self, quota: QuotaData) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Replace the quota snapshot wholesale.
    pub fn replace_quota(&mut self, quota: QuotaData) {
        self.quota = Some(quota);
    }

    /// Whether the quota subsystem has blocked checks for this account.
    pub fn is_forbidden(&self) -> bool {
        self.quota.as_ref().is_some_and(|q| q.is_forbidden)
    }

    /// Neither the account nor its proxy use has been switched off.
    pub const fn is_enabled(&self) -> bool {
        !self.disabled && !self.proxy_disabled
    }

    /// Subscription tier; accounts without quota data count as Free.
    pub fn tier(&self) -> SubscriptionTier {
        SubscriptionTier::classify(self.quota.as_ref().and_then(|q| q.subscription_tier.as_deref()))
    }

    /// Highest remaining percentage across all models, 0 when unknown.
    pub fn best_percentage(&self) -> i32 {
        self.quota.as_ref().and_then(QuotaData::best_model).map_or(0, |m| m.percentage)
    }
}
