use crate::error::ClientError;
use crate::types::*;
use antigravity_types::{Account, AppConfig, QuotaData, RefreshStats};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct AntigravityClient {
    client: Client,
    config: ClientConfig,
}

impl AntigravityClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Probe the usual manager locations and connect to the first that answers.
    pub async fn auto_discover(api_key: Option<String>) -> Result<Self, ClientError> {
        for base_url in discovery_candidates() {
            let config = ClientConfig { api_key: api_key.clone(), ..ClientConfig::new(base_url) };
            match Self::try_connect(config).await {
                Ok(client) => {
                    tracing::info!("[Client] Connected to Antigravity at {}", client.base_url());
                    return Ok(client);
                },
                Err(e) => tracing::debug!("[Client] Discovery probe failed: {}", e),
            }
        }
        Err(ClientError::ServerNotFound)
    }

    async fn try_connect(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Self::new(config)?;
        let resp = client
            .request(Method::GET, "/api/proxy/status")
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        if resp.status().is_success() {
            Ok(client)
        } else {
            Err(ClientError::Connection(format!("Health check failed: {}", resp.status())))
        }
    }

    pub async fn status(&self) -> Result<ServerStatus, ClientError> {
        self.get_json(&self.endpoint("/api/proxy/status")).await
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, ClientError> {
        let body: AccountListBody = self.get_json(&self.endpoint("/api/accounts")).await?;
        Ok(body.into_accounts())
    }

    pub async fn current_account(&self) -> Result<Option<Account>, ClientError> {
        self.get_json(&self.endpoint("/api/accounts/current")).await
    }

    /// Fetch a fresh quota snapshot for one account.
    /// A 404 comes back as `NotFound(account_id)`.
    pub async fn fetch_quota(&self, account_id: &str) -> Result<QuotaData, ClientError> {
        let url = self.account_url(account_id, "quota")?;
        self.get_json(url.as_str()).await.map_err(|e| match e {
            ClientError::NotFound(_) => ClientError::NotFound(account_id.to_string()),
            other => other,
        })
    }

    pub async fn refresh_all_quotas(&self) -> Result<RefreshStats, ClientError> {
        self.send_once(self.request(Method::POST, "/api/accounts/refresh")).await
    }

    /// Re-import the active account from the IDE's local store.
    /// `None` means the stored account was already current.
    pub async fn sync_account_from_db(&self) -> Result<Option<Account>, ClientError> {
        self.send_once(self.request(Method::POST, "/api/accounts/sync/db")).await
    }

    pub async fn load_config(&self) -> Result<AppConfig, ClientError> {
        self.get_json(&self.endpoint("/api/config")).await
    }

    pub async fn save_config(&self, config: &AppConfig) -> Result<(), ClientError> {
        let builder = self.request(Method::POST, "/api/config").json(&SaveConfigBody { config });
        let resp = builder.send().await?;
        check_status(resp).await.map(|_| ())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// `/api/accounts/{id}/{tail}` with the id percent-encoded as one segment.
    fn account_url(&self, account_id: &str, tail: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| ClientError::Connection(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Connection(format!("Invalid base URL: {}", self.config.base_url))
            })?
            .pop_if_empty()
            .extend(["api", "accounts", account_id, tail]);
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorize(self.client.request(method, self.endpoint(path)))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {}", key)),
            None => builder,
        }
    }

    /// GET with retry on 429 and 5xx. Every wait is capped by `max_delay_ms`.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let retry = &self.config.retry;
        let mut attempts = 0;
        let mut delay = retry.base_delay_ms.min(retry.max_delay_ms);

        loop {
            attempts += 1;
            match self.send_once(self.authorize(self.client.get(url))).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    if attempts > retry.max_retries {
                        tracing::warn!(
                            "[Client] GET {} failed after {} attempts: {}",
                            url,
                            attempts,
                            e
                        );
                        return Err(ClientError::RetriesExhausted {
                            attempts,
                            last_error: Box::new(e),
                        });
                    }
                    let wait = match &e {
                        ClientError::RateLimited { retry_after: Some(secs) } => {
                            secs.saturating_mul(1000).min(retry.max_delay_ms)
                        },
                        _ => delay,
                    };
                    tracing::debug!("[Client] {} on GET {}, retrying in {}ms", e, url, wait);
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                    delay = delay.saturating_mul(2).min(retry.max_delay_ms);
                },
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let resp = check_status(builder.send().await?).await?;
        let text = resp.text().await?;
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            Err(ClientError::RateLimited { retry_after })
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(ClientError::Unauthorized(status.as_u16()))
        },
        StatusCode::NOT_FOUND => Err(ClientError::NotFound(resp.url().path().to_string())),
        _ => {
            let message = resp.text().await.unwrap_or_default();
            Err(ClientError::ServerError { status: status.as_u16(), message })
        },
    }
}

fn discovery_candidates() -> Vec<String> {
    let mut candidates = Vec::new();
    if let Ok(url) = std::env::var("ANTIGRAVITY_URL") {
        candidates.push(url);
    }
    if let Ok(port) = std::env::var("ANTIGRAVITY_PORT") {
        candidates.push(format!("http://127.0.0.1:{}", port));
    }
    candidates.push("http://127.0.0.1:8045".to_string());
    candidates.push("http://127.0.0.1:8046".to_string());
    candidates
}
