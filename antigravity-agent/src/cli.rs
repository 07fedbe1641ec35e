use antigravity_core::AccountFilter;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "antigravity-agent",
    about = "Antigravity Agent - background quota refresh and account sync",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(
        short,
        long,
        global = true,
        env = "ANTIGRAVITY_URL",
        help = "Manager base URL (auto-discovered when omitted)"
    )]
    pub url: Option<String>,

    #[arg(long, global = true, env = "ANTIGRAVITY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, global = true, help = "Also write daily-rotated logs to this directory")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run auto-refresh and auto-sync in the foreground (default)")]
    Run {
        #[arg(long, default_value_t = 30, help = "Seconds between configuration polls")]
        config_poll_secs: u64,
    },

    #[command(about = "Show dashboard statistics")]
    Stats {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "List accounts with quota status")]
    Accounts {
        #[arg(short, long, help = "Case-insensitive email search")]
        search: Option<String>,

        #[arg(short, long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,

        #[arg(long, help = "Show only the N best accounts to switch to")]
        top: Option<usize>,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Refresh quota for one account, or all accounts")]
    Refresh {
        #[arg(help = "Email or account ID (all accounts when omitted)")]
        identifier: Option<String>,
    },

    #[command(about = "Re-import the active account from the local IDE store")]
    Sync,

    #[command(subcommand, about = "View and modify background task settings")]
    Config(ConfigCommands),

    #[command(subcommand, about = "Manage rotated log files (requires --log-dir)")]
    Logs(LogsCommands),
}

#[derive(Subcommand)]
pub enum LogsCommands {
    #[command(about = "Delete rotated log files from --log-dir")]
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Update background task settings")]
    Set {
        #[arg(long)]
        auto_refresh: Option<bool>,

        #[arg(long, allow_negative_numbers = true, help = "Minutes between quota refreshes")]
        refresh_interval: Option<i32>,

        #[arg(long)]
        auto_sync: Option<bool>,

        #[arg(long, allow_negative_numbers = true, help = "Seconds between account syncs")]
        sync_interval: Option<i32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FilterArg {
    All,
    Pro,
    Ultra,
    Free,
}

impl From<FilterArg> for AccountFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Pro => Self::Pro,
            FilterArg::Ultra => Self::Ultra,
            FilterArg::Free => Self::Free,
        }
    }
}
