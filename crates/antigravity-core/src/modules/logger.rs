//! Tracing setup for the agent.
//!
//! Console output is always on. When a log directory is given, a daily
//! rolling file is added next to it; the returned guard must be held for
//! the lifetime of the process or buffered lines are lost.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{AppError, AppResult};

/// File name prefix for rolling logs.
pub const LOG_FILE_PREFIX: &str = "antigravity-agent.log";

/// Filter used when neither `RUST_LOG` nor an explicit level is set.
pub const DEFAULT_FILTER: &str = "info";

/// Build the env filter. `RUST_LOG` wins over `directives`.
pub fn build_filter(directives: &str) -> AppResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directives)
        .map_err(|e| AppError::Logging(format!("invalid filter '{}': {}", directives, e)))
}

/// Install the global subscriber.
pub fn init_logging(directives: &str, log_dir: Option<&Path>) -> AppResult<Option<WorkerGuard>> {
    let filter = build_filter(directives)?;
    let console = fmt::layer().with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    tracing::info!("[Logger] Logging initialized");
    Ok(guard)
}

/// Remove rolled log files from `log_dir`. Returns how many were deleted.
pub fn clear_logs(log_dir: &Path) -> AppResult<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let is_log = entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX);
        if is_log && entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}
