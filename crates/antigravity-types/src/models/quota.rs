//! Quota data models.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Clamp a raw percentage into the valid `[0, 100]` range.
pub const fn clamp_percentage(value: i32) -> i32 {
    if value < 0 {
        0
    } else if value > 100 {
        100
    } else {
        value
    }
}

/// Model quota information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelQuota {
    /// Model name
    pub name: String,
    /// Remaining percentage (0-100)
    #[serde(deserialize_with = "deserialize_percentage")]
    pub percentage: i32,
    /// Time when quota resets, if the backend reported one
    #[serde(default, deserialize_with = "deserialize_reset_time")]
    pub reset_time: Option<DateTime<Utc>>,
}

impl ModelQuota {
    /// Create a model quota entry, clamping the percentage.
    pub fn new(name: impl Into<String>, percentage: i32, reset_time: Option<DateTime<Utc>>) -> Self {
        Self { name: name.into(), percentage: clamp_percentage(percentage), reset_time }
    }

    /// Case-insensitive exact match against a canonical model key.
    pub fn matches(&self, key: &str) -> bool {
        self.name.eq_ignore_ascii_case(key)
    }

    /// Seconds until reset relative to `now`, floored at zero.
    pub fn seconds_until_reset(&self, now: DateTime<Utc>) -> Option<i64> {
        self.reset_time.map(|reset| (reset - now).num_seconds().max(0))
    }
}

/// Per-account quota snapshot.
///
/// Replaced wholesale on every refresh; an absent model entry means
/// "unknown", never zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QuotaData {
    /// Per-model quota information
    #[serde(default)]
    pub models: Vec<ModelQuota>,
    /// Last time quota was updated
    #[serde(default)]
    pub last_updated: i64,
    /// Whether quota checks are blocked for this account
    #[serde(default)]
    pub is_forbidden: bool,
    /// Subscription tier (FREE/PRO/ULTRA)
    #[serde(default)]
    pub subscription_tier: Option<String>,
}

impl QuotaData {
    /// Create empty quota data.
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            last_updated: Utc::now().timestamp(),
            is_forbidden: false,
            subscription_tier: None,
        }
    }

    /// Add a model quota entry.
    pub fn add_model(
        &mut self,
        name: impl Into<String>,
        percentage: i32,
        reset_time: Option<DateTime<Utc>>,
    ) {
        self.models.push(ModelQuota::new(name, percentage, reset_time));
    }

    /// Find the entry for a canonical model key (case-insensitive exact match).
    pub fn find_model(&self, key: &str) -> Option<&ModelQuota> {
        self.models.iter().find(|m| m.matches(key))
    }

    /// Percentage for a canonical model key, `None` when the entry is missing.
    pub fn percentage_of(&self, key: &str) -> Option<i32> {
        self.find_model(key).map(|m| m.percentage)
    }

    /// Entry with the highest remaining percentage.
    pub fn best_model(&self) -> Option<&ModelQuota> {
        self.models.iter().max_by_key(|m| m.percentage)
    }

    /// Earliest known reset time across all models.
    pub fn next_reset(&self) -> Option<DateTime<Utc>> {
        self.models.iter().filter_map(|m| m.reset_time).min()
    }
}

fn deserialize_percentage<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    let bounded = raw.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    Ok(clamp_percentage(i32::try_from(bounded).unwrap_or_default()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawResetTime {
    Epoch(i64),
    Text(String),
}

fn deserialize_reset_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawResetTime>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(RawResetTime::Epoch(secs)) => Utc.timestamp_opt(secs, 0).single(),
        Some(RawResetTime::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.with_timezone(&Utc))
            }
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_best_model() {
        let mut quota = QuotaData::new();
        assert!(quota.best_model().is_none());
        quota.add_model("claude-sonnet-4-5", 50, None);
        quota.add_model("gemini-3-pro-high", 15, None);

        assert_eq!(quota.best_model().map(|m| m.name.as_str()), Some("claude-sonnet-4-5"));
    }

    #[test]
    fn test_percentage_clamped_on_construction() {
        assert_eq!(ModelQuota::new("m", 140, None).percentage, 100);
        assert_eq!(ModelQuota::new("m", -3, None).percentage, 0);
        assert_eq!(ModelQuota::new("m", 42, None).percentage, 42);
    }

    #[test]
    fn test_percentage_clamped_on_deserialize() {
        let quota: ModelQuota =
            serde_json::from_str(r#"{"name":"gemini-3-pro-high","percentage":250}"#).unwrap();
        assert_eq!(quota.percentage, 100);
        assert_eq!(quota.reset_time, None);
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_exact() {
        let mut quota = QuotaData::new();
        quota.add_model("Gemini-3-Pro-High", 70, None);

        assert_eq!(quota.percentage_of("gemini-3-pro-high"), Some(70));
        assert_eq!(quota.percentage_of("gemini-3-pro"), None);
        assert_eq!(quota.percentage_of("claude-sonnet-4-5"), None);
    }

    #[test]
    fn test_reset_time_formats() {
        let rfc: ModelQuota = serde_json::from_str(
            r#"{"name":"a","percentage":1,"reset_time":"2026-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert_eq!(rfc.reset_time.unwrap().timestamp(), 1_767_323_045);

        let epoch: ModelQuota =
            serde_json::from_str(r#"{"name":"a","percentage":1,"reset_time":1767323045}"#).unwrap();
        assert_eq!(epoch.reset_time, rfc.reset_time);

        let empty: ModelQuota =
            serde_json::from_str(r#"{"name":"a","percentage":1,"reset_time":""}"#).unwrap();
        assert_eq!(empty.reset_time, None);

        let null: ModelQuota =
            serde_json::from_str(r#"{"name":"a","percentage":1,"reset_time":null}"#).unwrap();
        assert_eq!(null.reset_time, None);
    }

    #[test]
    fn test_next_reset_and_countdown() {
        let early = Utc.timestamp_opt(1_000, 0).single();
        let late = Utc.timestamp_opt(5_000, 0).single();
        let mut quota = QuotaData::new();
        quota.add_model("a", 10, late);
        quota.add_model("b", 10, None);
        quota.add_model("c", 10, early);

        assert_eq!(quota.next_reset(), early);

        let now = Utc.timestamp_opt(2_000, 0).single().unwrap();
        assert_eq!(quota.models[0].seconds_until_reset(now), Some(3_000));
        assert_eq!(quota.models[1].seconds_until_reset(now), None);
        assert_eq!(quota.models[2].seconds_until_reset(now), Some(0));
    }
}
