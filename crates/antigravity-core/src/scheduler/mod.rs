//! Background Scheduler
//!
//! Drives two independent recurring lanes from the configuration:
//!
//! - **Refresh** - `auto_refresh` / `refresh_interval` (minutes), calls
//!   `AccountSource::refresh_all_quotas`
//! - **Sync** - `auto_sync` / `sync_interval` (seconds), calls
//!   `AccountSource::sync_account_from_store`
//!
//! Per lane:
//! - At most one live timer; any previous timer is aborted before a new
//!   one is armed
//! - The off→on edge of the enable flag runs the action once immediately,
//!   ahead of the first timer tick
//! - A changed interval re-arms the timer without an extra immediate run
//! - Ticks keep a fixed cadence; each tick spawns the action detached, so
//!   slow or failing calls never delay or stop later ticks
//! - Failures are logged and dropped; the next tick is the retry
//!
//! Edges are detected on the states `apply` actually observes. When
//! driven by [`BackgroundScheduler::run`] the `watch` channel coalesces
//! bursts, so a quick on→off→on that is never seen as "off" does not
//! produce a second immediate run.
//!
//! Losing the configuration (`Loading`, `Unavailable`, or `apply(None)`)
//! tears both lanes down and forgets the previous enable flag. A single
//! failed config poll is therefore followed, once the next poll succeeds,
//! by a fresh immediate run for every enabled lane, even though the flag
//! itself never changed.

mod lane;


pub use lane::{LaneStatus, TimerId};

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::modules::config_watch::ConfigState;
use crate::modules::source::AccountSource;
use antigravity_types::{AppConfig, RefreshStats};
use lane::{LaneAction, LaneSettings, LaneState};

const EVENT_CAPACITY: usize = 64;

/// One independently scheduled background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Refresh,
    Sync,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::Refresh, Lane::Sync];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Refresh => "auto-refresh",
            Self::Sync => "auto-sync",
        }
    }

    fn settings(self, config: Option<&AppConfig>) -> LaneSettings {
        let Some(config) = config else {
            return LaneSettings::DISABLED;
        };
        match self {
            Self::Refresh => {
                LaneSettings { enabled: config.auto_refresh, period: config.refresh_period() }
            },
            Self::Sync => LaneSettings { enabled: config.auto_sync, period: config.sync_period() },
        }
    }
}

/// Result of one lane execution, broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaneOutcome {
    Refreshed(RefreshStats),
    Synced { account_id: Option<String> },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneEvent {
    pub lane: Lane,
    pub outcome: LaneOutcome,
}

pub struct BackgroundScheduler {
    refresh: LaneState,
    sync: LaneState,
    refresh_action: LaneAction,
    sync_action: LaneAction,
    events: broadcast::Sender<LaneEvent>,
}

impl BackgroundScheduler {
    pub fn new(source: Arc<dyn AccountSource>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            refresh: LaneState::default(),
            sync: LaneState::default(),
            refresh_action: lane_action(Lane::Refresh, Arc::clone(&source), events.clone()),
            sync_action: lane_action(Lane::Sync, source, events.clone()),
            events,
        }
    }

    /// Subscribe to lane execution outcomes.
    pub fn subscribe(&self) -> broadcast::Receiver<LaneEvent> {
        self.events.subscribe()
    }

    /// Reconcile both lanes with a configuration snapshot.
    ///
    /// `None` means no configuration is available; both lanes drop to
    /// `Disabled` until one arrives. Must be called inside a Tokio runtime.
    pub fn apply(&mut self, config: Option<&AppConfig>) {
        self.refresh.apply(Lane::Refresh, Lane::Refresh.settings(config), &self.refresh_action);
        self.sync.apply(Lane::Sync, Lane::Sync.settings(config), &self.sync_action);
    }

    pub fn status(&self, lane: Lane) -> LaneStatus {
        self.lane(lane).status()
    }

    pub fn timer_id(&self, lane: Lane) -> Option<TimerId> {
        self.lane(lane).timer_id()
    }

    /// Release both timers. In-flight actions are left to finish.
    pub fn shutdown(&mut self) {
        self.refresh.teardown(Lane::Refresh);
        self.sync.teardown(Lane::Sync);
    }

    /// Follow configuration changes until shutdown is signalled or the
    /// configuration channel closes, then release both timers.
    pub async fn run(
        mut self,
        mut config_rx: watch::Receiver<ConfigState>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        tracing::info!("[Scheduler] Background scheduler started");

        while !*shutdown_rx.borrow() {
            let state = config_rx.borrow_and_update().clone();
            if let ConfigState::Unavailable(reason) = &state {
                tracing::warn!("[Scheduler] Configuration unavailable, lanes paused: {}", reason);
            }
            self.apply(state.config());

            tokio::select! {
                changed = config_rx.changed() => {
                    if changed.is_err() {
                        tracing::info!("[Scheduler] Configuration channel closed");
                        break;
                    }
                },
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                },
            }
        }

        self.shutdown();
        tracing::info!("[Scheduler] Background scheduler stopped");
    }

    fn lane(&self, lane: Lane) -> &LaneState {
        match lane {
            Lane::Refresh => &self.refresh,
            Lane::Sync => &self.sync,
        }
    }
}

impl Drop for BackgroundScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lane_action(
    lane: Lane,
    source: Arc<dyn AccountSource>,
    events: broadcast::Sender<LaneEvent>,
) -> LaneAction {
    Arc::new(move || {
        let source = Arc::clone(&source);
        let events = events.clone();
        tokio::spawn(async move {
            let outcome = execute(lane, source.as_ref()).await;
            let _ = events.send(LaneEvent { lane, outcome });
        });
    })
}

async fn execute(lane: Lane, source: &dyn AccountSource) -> LaneOutcome {
    match lane {
        Lane::Refresh => match source.refresh_all_quotas().await {
            Ok(stats) => {
                tracing::info!(
                    "[Scheduler] Auto refresh: {}/{} accounts ({} failed)",
                    stats.success,
                    stats.total,
                    stats.failed
                );
                LaneOutcome::Refreshed(stats)
            },
            Err(e) => {
                tracing::warn!("[Scheduler] Auto refresh failed: {}", e);
                LaneOutcome::Failed(e.to_string())
            },
        },
        Lane::Sync => match source.sync_account_from_store().await {
            Ok(account) => {
                let account_id = account.map(|a| a.id);
                tracing::debug!("[Scheduler] Auto sync done (current: {:?})", account_id);
                LaneOutcome::Synced { account_id }
            },
            Err(e) => {
                tracing::warn!("[Scheduler] Auto sync failed: {}", e);
                LaneOutcome::Failed(e.to_string())
            },
        },
    }
}
