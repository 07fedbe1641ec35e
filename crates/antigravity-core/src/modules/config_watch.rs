//! Configuration polling.
//!
//! Polls a [`ConfigSource`] on a fixed interval and publishes the result on
//! a `watch` channel. Subscribers are only woken when the published state
//! actually changes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::source::ConfigSource;
use antigravity_types::AppConfig;

/// Poll cadence used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Latest known configuration, as seen by subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigState {
    /// Nothing loaded yet.
    Loading,
    Ready(Arc<AppConfig>),
    /// Last load failed; background lanes stay paused until it recovers.
    Unavailable(String),
}

impl ConfigState {
    /// The configuration, if one is available.
    pub fn config(&self) -> Option<&AppConfig> {
        match self {
            Self::Ready(config) => Some(config),
            Self::Loading | Self::Unavailable(_) => None,
        }
    }
}

pub struct ConfigWatcher {
    source: Arc<dyn ConfigSource>,
    poll_interval: Duration,
    tx: watch::Sender<ConfigState>,
}

impl ConfigWatcher {
    pub fn new(
        source: Arc<dyn ConfigSource>,
        poll_interval: Duration,
    ) -> (Self, watch::Receiver<ConfigState>) {
        let (tx, rx) = watch::channel(ConfigState::Loading);
        (Self { source, poll_interval, tx }, rx)
    }

    /// Load once and publish. Returns whether subscribers were notified.
    pub async fn poll_once(&self) -> bool {
        let next = match self.source.load_config().await {
            Ok(config) => ConfigState::Ready(Arc::new(config)),
            Err(e) => {
                tracing::warn!("[ConfigWatch] Failed to load config: {}", e);
                ConfigState::Unavailable(e.to_string())
            },
        };
        self.tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            tracing::debug!("[ConfigWatch] Configuration changed");
            *current = next;
            true
        })
    }

    /// Poll until shutdown is signalled. The first poll happens immediately.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            "[ConfigWatch] Polling configuration every {}s",
            self.poll_interval.as_secs()
        );

        while !*shutdown_rx.borrow() {
            tokio::select! {
                _ = interval.tick() => {
                    self.poll_once().await;
                },
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                },
            }
        }

        tracing::info!("[ConfigWatch] Stopped");
    }
}
