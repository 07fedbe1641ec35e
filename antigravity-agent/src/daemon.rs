//! Foreground agent loop.
//!
//! Wires the config watcher and the background scheduler to the manager
//! client and keeps a live dashboard snapshot that is re-read after every
//! refresh or sync.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use antigravity_client::AntigravityClient;
use antigravity_core::modules::aggregator::is_low_quota;
use antigravity_core::modules::ranking::DEFAULT_BEST_LIMIT;
use antigravity_core::{
    best_accounts, BackgroundScheduler, ConfigWatcher, LaneEvent, LaneOutcome,
    QuotaAggregator, SelectionState,
};
use antigravity_types::{Account, DashboardStats};

/// Latest account snapshot and the stats derived from it.
pub struct Dashboard {
    accounts: Mutex<Arc<[Account]>>,
    aggregator: Mutex<QuotaAggregator>,
    session: Mutex<SelectionState>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(Arc::from(Vec::new())),
            aggregator: Mutex::new(QuotaAggregator::new()),
            session: Mutex::new(SelectionState::new()),
        }
    }
}

impl Dashboard {
    /// Swap in a new snapshot and return its stats.
    pub fn update(&self, accounts: Vec<Account>, current_id: Option<String>) -> DashboardStats {
        let snapshot: Arc<[Account]> = accounts.into();
        {
            let mut session = self.session.lock();
            session.set_current_account(current_id);
            session.retain_known(snapshot.iter().map(|a| a.id.as_str()));
        }
        *self.accounts.lock() = Arc::clone(&snapshot);
        self.aggregator.lock().stats(&snapshot).clone()
    }

    pub fn stats(&self) -> DashboardStats {
        let snapshot = self.accounts.lock().clone();
        self.aggregator.lock().stats(&snapshot).clone()
    }

    pub fn set_current_account(&self, account_id: Option<String>) {
        self.session.lock().set_current_account(account_id);
    }

    pub fn current_account_id(&self) -> Option<String> {
        self.session.lock().current_account_id().map(str::to_string)
    }

    /// Emails of the best switch candidates, excluding the active account.
    pub fn switch_candidates(&self) -> Vec<String> {
        let snapshot = self.accounts.lock().clone();
        let current = self.current_account_id();
        best_accounts(&snapshot, DEFAULT_BEST_LIMIT)
            .into_iter()
            .filter(|a| current.as_deref() != Some(a.id.as_str()))
            .map(|a| a.email.clone())
            .collect()
    }

    fn low_quota_emails(&self) -> Vec<String> {
        let snapshot = self.accounts.lock().clone();
        snapshot.iter().filter(|a| is_low_quota(a)).map(|a| a.email.clone()).collect()
    }
}

pub async fn run(client: Arc<AntigravityClient>, config_poll: Duration) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let dashboard = Arc::new(Dashboard::default());

    let (watcher, config_rx) = ConfigWatcher::new(client.clone(), config_poll);
    let scheduler = BackgroundScheduler::new(client.clone());
    let events = scheduler.subscribe();

    reload(&client, &dashboard).await;

    let watcher_task = tokio::spawn(watcher.run(shutdown_rx.clone()));
    let scheduler_task = tokio::spawn(scheduler.run(config_rx, shutdown_rx.clone()));
    let monitor_task =
        tokio::spawn(monitor(client.clone(), events, dashboard.clone(), shutdown_rx));

    info!("[Agent] Running against {} (Ctrl+C to stop)", client.base_url());
    shutdown_signal().await;
    shutdown_tx.send_replace(true);

    for (name, task) in
        [("config watcher", watcher_task), ("scheduler", scheduler_task), ("monitor", monitor_task)]
    {
        if let Err(e) = task.await {
            warn!("[Agent] {} task ended abnormally: {}", name, e);
        }
    }

    let stats = dashboard.stats();
    info!(
        "[Agent] Stopped. {} accounts, avg Gemini {}%, avg Claude {}%, {} low",
        stats.total_accounts, stats.avg_gemini_quota, stats.avg_claude_quota, stats.low_quota_count
    );
    Ok(())
}

async fn monitor(
    client: Arc<AntigravityClient>,
    mut events: broadcast::Receiver<LaneEvent>,
    dashboard: Arc<Dashboard>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    while !*shutdown_rx.borrow() {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => handle_event(&client, &dashboard, event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("[Agent] Missed {} scheduler events", skipped);
                },
                Err(broadcast::error::RecvError::Closed) => break,
            },
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            },
        }
    }
}

async fn handle_event(client: &AntigravityClient, dashboard: &Dashboard, event: LaneEvent) {
    match event.outcome {
        LaneOutcome::Refreshed(_) => reload(client, dashboard).await,
        LaneOutcome::Synced { account_id: Some(id) } => {
            info!("[Agent] Active account changed to {}", id);
            dashboard.set_current_account(Some(id));
            reload(client, dashboard).await;
        },
        LaneOutcome::Synced { account_id: None } | LaneOutcome::Failed(_) => {},
    }
}

async fn reload(client: &AntigravityClient, dashboard: &Dashboard) {
    let accounts = match client.list_accounts().await {
        Ok(accounts) => accounts,
        Err(e) => {
            warn!("[Agent] Failed to reload accounts: {}", e);
            return;
        },
    };
    let current_id = match client.current_account().await {
        Ok(current) => current.map(|a| a.id),
        Err(_) => dashboard.current_account_id(),
    };

    let stats = dashboard.update(accounts, current_id);
    info!(
        "[Agent] {} accounts | Gemini {}% | Image {}% | Claude {}% | Ultra {} Pro {} Free {}",
        stats.total_accounts,
        stats.avg_gemini_quota,
        stats.avg_gemini_image_quota,
        stats.avg_claude_quota,
        stats.ultra_count,
        stats.pro_count,
        stats.free_count
    );

    if stats.low_quota_count > 0 {
        warn!(
            "[Agent] {} account(s) low on quota: {}",
            stats.low_quota_count,
            dashboard.low_quota_emails().join(", ")
        );
    }
    if let Some(best) = dashboard.switch_candidates().first() {
        info!("[Agent] Best account to switch to: {}", best);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("[Agent] Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                warn!("[Agent] Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("[Agent] Received Ctrl+C, shutting down"),
        () = terminate => info!("[Agent] Received SIGTERM, shutting down"),
    }
}
