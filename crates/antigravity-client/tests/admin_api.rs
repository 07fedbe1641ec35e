#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test, panics are the assertion mechanism")]

use antigravity_client::{AntigravityClient, ClientConfig, ClientError, RetryConfig};
use antigravity_core::{AccountSource, AppError, ConfigSource};
use antigravity_types::{AccountError, AppConfig, ConfigError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "sk-admin-test";

fn account_json(id: &str, tier: &str, pct: i32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "name": null,
        "is_current": false,
        "disabled": false,
        "proxy_disabled": false,
        "protected_models": [],
        "device_bound": false,
        "last_used": 1_767_225_600,
        "quota": {
            "models": [
                {"name": "gemini-3-pro-high", "percentage": pct, "reset_time": "2026-01-01T05:00:00Z"},
                {"name": "claude-sonnet-4-5", "percentage": pct, "reset_time": ""}
            ],
            "last_updated": 1_767_225_600,
            "subscription_tier": tier,
            "is_forbidden": false
        }
    })
}

fn client_for(server: &MockServer) -> AntigravityClient {
    let config = ClientConfig {
        retry: RetryConfig { max_retries: 2, base_delay_ms: 1, max_delay_ms: 5 },
        ..ClientConfig::new(server.uri()).with_api_key(API_KEY)
    };
    AntigravityClient::new(config).expect("client builds")
}

#[tokio::test]
async fn test_list_accounts_envelope_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts"))
        .and(header("Authorization", format!("Bearer {API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accounts": [account_json("a", "g1-pro-tier", 80), account_json("b", "FREE", 10)],
            "current_account_id": "a"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let accounts = client_for(&server).list_accounts().await.expect("list succeeds");

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].id, "a");
    let quota = accounts[0].quota.as_ref().expect("quota present");
    assert_eq!(quota.percentage_of("gemini-3-pro-high"), Some(80));
    assert!(quota.models[0].reset_time.is_some());
    assert!(quota.models[1].reset_time.is_none());
}

#[tokio::test]
async fn test_list_accounts_accepts_bare_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([account_json("only", "ULTRA", 55)])),
        )
        .mount(&server)
        .await;

    let accounts = client_for(&server).list_accounts().await.expect("list succeeds");
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].tier(), antigravity_types::SubscriptionTier::Ultra);
}

#[tokio::test]
async fn test_reads_retry_on_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/current"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json("cur", "PRO", 40)))
        .expect(1)
        .mount(&server)
        .await;

    let current = client_for(&server).current_account().await.expect("third attempt succeeds");
    assert_eq!(current.map(|a| a.id), Some("cur".to_string()));
}

#[tokio::test]
async fn test_reads_honour_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "auto_refresh": true,
            "refresh_interval": 10
        })))
        .mount(&server)
        .await;

    let config = client_for(&server).load_config().await.expect("retry succeeds");
    assert!(config.auto_refresh);
    assert_eq!(config.refresh_interval, 10);
    assert_eq!(config.sync_interval, 5, "missing fields fall back to defaults");
}

#[tokio::test]
async fn test_reads_give_up_after_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server).list_accounts().await.expect_err("always failing");
    match err {
        ClientError::RetriesExhausted { attempts, last_error } => {
            assert_eq!(attempts, 3);
            match *last_error {
                ClientError::ServerError { status, message } => {
                    assert_eq!(status, 500);
                    assert_eq!(message, "boom");
                },
                other => panic!("unexpected last error: {other:?}"),
            }
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_huge_retry_after_is_capped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("retry-after", u64::MAX.to_string().as_str()),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "auto_sync": true
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let load = client.load_config();
    let config = tokio::time::timeout(std::time::Duration::from_secs(5), load)
        .await
        .expect("wait is capped by max_delay_ms")
        .expect("retry succeeds");
    assert!(config.auto_sync);
}

#[tokio::test]
async fn test_refresh_all_is_sent_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/refresh"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).refresh_all_quotas().await.expect_err("502 surfaces");
    match err {
        ClientError::ServerError { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "upstream down");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_all_returns_stats() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total": 3,
            "success": 2,
            "failed": 1,
            "details": ["c@example.com: 403"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let source: &dyn AccountSource = &client;
    let stats = source.refresh_all_quotas().await.expect("refresh succeeds");
    assert_eq!((stats.total, stats.success, stats.failed), (3, 2, 1));
    assert!(!stats.is_clean());
}

#[tokio::test]
async fn test_sync_null_means_already_current() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/sync/db"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let synced = client.sync_account_from_store().await.expect("sync succeeds");
    assert!(synced.is_none());
}

#[tokio::test]
async fn test_missing_account_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/ghost/quota"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.refresh_quota("ghost").await.expect_err("404 surfaces");
    match err {
        AppError::Account(AccountError::NotFound { id }) => assert_eq!(id, "ghost"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_account_id_is_encoded_as_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/team%2Fa%20b/quota"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{"name": "gemini-3-pro-high", "percentage": 64}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quota = client_for(&server).fetch_quota("team/a b").await.expect("quota fetched");
    assert_eq!(quota.percentage_of("gemini-3-pro-high"), Some(64));
}

#[tokio::test]
async fn test_refresh_failure_names_the_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/acc-9/quota"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.refresh_quota("acc-9").await.expect_err("403 surfaces");
    match err {
        AppError::Account(AccountError::RefreshFailed { id, message }) => {
            assert_eq!(id, "acc-9");
            assert!(message.contains("403"), "got {message}");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_config_not_found_is_a_config_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = ConfigSource::load_config(&client).await.expect_err("404 surfaces");
    assert!(matches!(err, AppError::Config(ConfigError::Unavailable { .. })), "got {err:?}");
}

#[tokio::test]
async fn test_config_garbage_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"auto_sync\": \"yes\"}"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = ConfigSource::load_config(&client).await.expect_err("wrong type");
    assert!(matches!(err, AppError::Config(ConfigError::ParseError { .. })), "got {err:?}");
}

#[tokio::test]
async fn test_rejected_save_is_a_write_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = ConfigSource::save_config(&client, &AppConfig::new()).await.expect_err("500");
    match err {
        AppError::Config(ConfigError::WriteError { message }) => {
            assert!(message.contains("disk full"), "got {message}");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_sync_failure_is_an_account_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/sync/db"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.sync_account_from_store().await.expect_err("503 surfaces");
    assert!(matches!(err, AppError::Account(AccountError::SyncFailed { .. })), "got {err:?}");
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).load_config().await.expect_err("401 surfaces");
    assert!(matches!(err, ClientError::Unauthorized(401)));
}

#[tokio::test]
async fn test_save_config_wraps_and_preserves_unknown_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .and(body_partial_json(serde_json::json!({
            "config": {
                "auto_sync": true,
                "sync_interval": 30,
                "language": "en",
                "proxy": {"port": 8045}
            }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config: AppConfig = serde_json::from_value(serde_json::json!({
        "auto_sync": false,
        "sync_interval": 5,
        "language": "en",
        "proxy": {"port": 8045}
    }))
    .expect("config parses");
    config.auto_sync = true;
    config.sync_interval = 30;

    let client = client_for(&server);
    ConfigSource::save_config(&client, &config).await.expect("save succeeds");
}

#[tokio::test]
async fn test_invalid_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/current"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).current_account().await.expect_err("html is not json");
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}
