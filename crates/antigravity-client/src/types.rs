use antigravity_types::{Account, AppConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8045".to_string(),
            api_key: None,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

/// `GET /api/accounts` body. Older managers return a bare list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum AccountListBody {
    Envelope {
        accounts: Vec<Account>,
        #[serde(default)]
        current_account_id: Option<String>,
    },
    Bare(Vec<Account>),
}

impl AccountListBody {
    pub(crate) fn into_accounts(self) -> Vec<Account> {
        match self {
            Self::Envelope { accounts, .. } | Self::Bare(accounts) => accounts,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveConfigBody<'a> {
    pub config: &'a AppConfig,
}

/// `GET /api/proxy/status`, used as the discovery probe.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub active_accounts: usize,
}
