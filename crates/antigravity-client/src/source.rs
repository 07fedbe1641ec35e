//! Core source traits backed by the manager's admin API.
//!
//! Per-account and config calls are classified into the typed error
//! domains; list/current/refresh-all failures stay `AppError::Backend`.

use async_trait::async_trait;

use crate::client::AntigravityClient;
use crate::error::ClientError;
use antigravity_core::{AccountSource, AppResult, ConfigSource};
use antigravity_types::{
    Account, AccountError, AppConfig, ConfigError, QuotaData, RefreshStats, TypedError,
};

#[async_trait]
impl AccountSource for AntigravityClient {
    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        Ok(AntigravityClient::list_accounts(self).await?)
    }

    async fn current_account(&self) -> AppResult<Option<Account>> {
        Ok(AntigravityClient::current_account(self).await?)
    }

    async fn refresh_quota(&self, account_id: &str) -> AppResult<QuotaData> {
        Ok(self.fetch_quota(account_id).await.map_err(|e| refresh_error(account_id, e))?)
    }

    async fn refresh_all_quotas(&self) -> AppResult<RefreshStats> {
        Ok(AntigravityClient::refresh_all_quotas(self).await?)
    }

    async fn sync_account_from_store(&self) -> AppResult<Option<Account>> {
        Ok(self.sync_account_from_db().await.map_err(|e| {
            TypedError::from(AccountError::SyncFailed { message: e.to_string() })
        })?)
    }
}

#[async_trait]
impl ConfigSource for AntigravityClient {
    async fn load_config(&self) -> AppResult<AppConfig> {
        Ok(AntigravityClient::load_config(self).await.map_err(config_read_error)?)
    }

    async fn save_config(&self, config: &AppConfig) -> AppResult<()> {
        Ok(AntigravityClient::save_config(self, config).await.map_err(|e| {
            TypedError::from(ConfigError::WriteError { message: e.to_string() })
        })?)
    }
}

fn refresh_error(account_id: &str, err: ClientError) -> TypedError {
    match err {
        ClientError::NotFound(id) => AccountError::NotFound { id }.into(),
        other => {
            AccountError::RefreshFailed { id: account_id.to_string(), message: other.to_string() }
                .into()
        },
    }
}

fn config_read_error(err: ClientError) -> TypedError {
    match err {
        ClientError::InvalidResponse(message) => ConfigError::ParseError { message }.into(),
        other => ConfigError::Unavailable { reason: other.to_string() }.into(),
    }
}
