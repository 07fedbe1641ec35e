//! Antigravity Agent - headless companion for Antigravity Manager.
//!
//! Runs the auto-refresh and auto-sync lanes against a running manager and
//! offers one-shot commands for stats, accounts and background settings.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use antigravity_client::{AntigravityClient, ClientConfig};
use antigravity_core::modules::config_watch::DEFAULT_POLL_INTERVAL;
use antigravity_core::modules::logger;

mod cli;
mod commands;
mod config_commands;
mod daemon;

use cli::{Cli, Commands, ConfigCommands, LogsCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logger::init_logging(&cli.log_level, cli.log_dir.as_deref())
        .context("Failed to initialize logging")?;

    let command = cli
        .command
        .unwrap_or(Commands::Run { config_poll_secs: DEFAULT_POLL_INTERVAL.as_secs() });

    if let Commands::Logs(LogsCommands::Clear) = command {
        let dir = cli.log_dir.context("logs clear needs --log-dir")?;
        return config_commands::clear_logs(&dir);
    }

    let client = connect(cli.url, cli.api_key).await?;
    dispatch(client, command).await
}

async fn dispatch(client: AntigravityClient, command: Commands) -> Result<()> {
    match command {
        Commands::Run { config_poll_secs } => {
            daemon::run(Arc::new(client), Duration::from_secs(config_poll_secs.max(1))).await
        },
        Commands::Stats { json } => commands::show_stats(&client, json).await,
        Commands::Accounts { search, filter, top, json } => {
            commands::list_accounts(&client, search, filter.into(), top, json).await
        },
        Commands::Refresh { identifier } => commands::refresh(&client, identifier).await,
        Commands::Sync => commands::sync(&client).await,
        Commands::Config(ConfigCommands::Show { json }) => {
            config_commands::show_config(&client, json).await
        },
        Commands::Config(ConfigCommands::Set {
            auto_refresh,
            refresh_interval,
            auto_sync,
            sync_interval,
        }) => {
            let update = config_commands::ConfigUpdate {
                auto_refresh,
                refresh_interval,
                auto_sync,
                sync_interval,
            };
            config_commands::set_config(&client, update).await
        },
        Commands::Logs(_) => anyhow::bail!("logs commands run without a manager connection"),
    }
}

async fn connect(url: Option<String>, api_key: Option<String>) -> Result<AntigravityClient> {
    match url {
        Some(url) => {
            let config = ClientConfig { api_key, ..ClientConfig::new(url) };
            AntigravityClient::new(config).context("Failed to build HTTP client")
        },
        None => AntigravityClient::auto_discover(api_key)
            .await
            .context("No Antigravity Manager found; pass --url or set ANTIGRAVITY_URL"),
    }
}
