//! Per-lane state machine.
//!
//! A lane remembers the last enable flag it observed and owns at most one
//! timer. Every transition goes through [`LaneState::apply`], which tears
//! the old timer down before anything new is armed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::Lane;

/// Fire-and-forget trigger for a lane's action.
pub(crate) type LaneAction = Arc<dyn Fn() + Send + Sync>;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        Self(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Observable state of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneStatus {
    /// Enable flag is off (or no configuration is available).
    Disabled,
    /// Enabled, but the interval is not positive so no timer runs.
    ArmedNoTimer,
    /// Enabled with a live timer at the given cadence.
    Running { period: Duration },
}

/// What the configuration asks of one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LaneSettings {
    pub enabled: bool,
    pub period: Option<Duration>,
}

impl LaneSettings {
    pub const DISABLED: Self = Self { enabled: false, period: None };
}

/// Recurring timer task; aborted when dropped.
struct LaneTimer {
    id: TimerId,
    period: Duration,
    handle: JoinHandle<()>,
}

impl LaneTimer {
    fn start(lane: Lane, period: Duration, action: LaneAction) -> Self {
        let id = TimerId::next();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tracing::debug!("[Scheduler] {} tick", lane.name());
                action();
            }
        });
        Self { id, period, handle }
    }
}

impl Drop for LaneTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Default)]
pub(crate) struct LaneState {
    previous_enabled: bool,
    timer: Option<LaneTimer>,
}

impl LaneState {
    pub fn apply(&mut self, lane: Lane, settings: LaneSettings, action: &LaneAction) {
        let rising_edge = settings.enabled && !self.previous_enabled;
        self.previous_enabled = settings.enabled;

        let period = match settings.period {
            Some(period) if settings.enabled => period,
            _ => {
                if self.timer.take().is_some() {
                    tracing::info!("[Scheduler] Clearing {} timer", lane.name());
                }
                return;
            },
        };

        if !rising_edge && self.timer.as_ref().is_some_and(|t| t.period == period) {
            return;
        }

        if self.timer.take().is_some() {
            tracing::info!("[Scheduler] Clearing {} timer", lane.name());
        }

        if rising_edge {
            tracing::info!("[Scheduler] {} enabled, executing immediately", lane.name());
            action();
        }

        tracing::info!("[Scheduler] Starting {} timer every {:?}", lane.name(), period);
        self.timer = Some(LaneTimer::start(lane, period, Arc::clone(action)));
    }

    /// Drop the timer and forget the enable flag; the next enabled
    /// config counts as a rising edge.
    pub fn teardown(&mut self, lane: Lane) {
        self.previous_enabled = false;
        if self.timer.take().is_some() {
            tracing::info!("[Scheduler] Clearing {} timer", lane.name());
        }
    }

    pub fn status(&self) -> LaneStatus {
        match &self.timer {
            Some(timer) => LaneStatus::Running { period: timer.period },
            None if self.previous_enabled => LaneStatus::ArmedNoTimer,
            None => LaneStatus::Disabled,
        }
    }

    pub fn timer_id(&self) -> Option<TimerId> {
        self.timer.as_ref().map(|t| t.id)
    }
}
