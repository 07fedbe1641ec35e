//! Statistics models.

use serde::{Deserialize, Serialize};

/// Dashboard statistics derived from account data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DashboardStats {
    /// Total number of accounts
    pub total_accounts: usize,
    /// Average Gemini Pro (high) quota percentage
    pub avg_gemini_quota: i32,
    /// Average Gemini image generation quota percentage
    pub avg_gemini_image_quota: i32,
    /// Average Claude Sonnet quota percentage
    pub avg_claude_quota: i32,
    /// Number of accounts with low quota (< 20%)
    pub low_quota_count: usize,
    /// Number of Pro tier accounts
    pub pro_count: usize,
    /// Number of Ultra tier accounts
    pub ultra_count: usize,
    /// Number of Free tier accounts
    pub free_count: usize,
}

/// Outcome of a "refresh all quotas" run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RefreshStats {
    /// Total accounts attempted
    #[serde(default)]
    pub total: usize,
    /// Successfully refreshed
    #[serde(default)]
    pub success: usize,
    /// Failed to refresh
    #[serde(default)]
    pub failed: usize,
    /// Per-account failure messages
    #[serde(default)]
    pub details: Vec<String>,
}

impl RefreshStats {
    /// Whether every attempted account refreshed successfully.
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
