use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use antigravity_client::AntigravityClient;
use antigravity_core::modules::logger;
use antigravity_types::AppConfig;

/// Requested changes; `None` leaves a field as it is.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigUpdate {
    pub auto_refresh: Option<bool>,
    pub refresh_interval: Option<i32>,
    pub auto_sync: Option<bool>,
    pub sync_interval: Option<i32>,
}

impl ConfigUpdate {
    pub const fn is_empty(&self) -> bool {
        self.auto_refresh.is_none()
            && self.refresh_interval.is_none()
            && self.auto_sync.is_none()
            && self.sync_interval.is_none()
    }

    pub fn apply_to(self, config: &mut AppConfig) {
        if let Some(v) = self.auto_refresh {
            config.auto_refresh = v;
        }
        if let Some(v) = self.refresh_interval {
            config.refresh_interval = v;
        }
        if let Some(v) = self.auto_sync {
            config.auto_sync = v;
        }
        if let Some(v) = self.sync_interval {
            config.sync_interval = v;
        }
    }
}

pub async fn show_config(client: &AntigravityClient, json: bool) -> Result<()> {
    let config = client.load_config().await.context("Failed to load config")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print_background_settings(&config);
    }
    Ok(())
}

pub async fn set_config(client: &AntigravityClient, update: ConfigUpdate) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!(
            "Nothing to change; pass --auto-refresh, --refresh-interval, --auto-sync or --sync-interval"
        );
    }

    let mut config = client.load_config().await.context("Failed to load config")?;
    update.apply_to(&mut config);
    client.save_config(&config).await.context("Failed to save config")?;

    println!("{} Config updated", "✓".green());
    print_background_settings(&config);
    Ok(())
}

pub fn clear_logs(dir: &Path) -> Result<()> {
    let removed = logger::clear_logs(dir)
        .with_context(|| format!("Failed to clear logs in {}", dir.display()))?;
    println!("{} Removed {} log file(s) from {}", "✓".green(), removed, dir.display());
    Ok(())
}

fn print_background_settings(config: &AppConfig) {
    println!("{}", "Background Tasks:".cyan().bold());
    println!(
        "  Auto refresh: {} (every {} min){}",
        on_off(config.auto_refresh),
        config.refresh_interval,
        idle_note(config.auto_refresh, config.refresh_period().is_some())
    );
    println!(
        "  Auto sync:    {} (every {} s){}",
        on_off(config.auto_sync),
        config.sync_interval,
        idle_note(config.auto_sync, config.sync_period().is_some())
    );
}

fn on_off(enabled: bool) -> colored::ColoredString {
    if enabled {
        "on".green()
    } else {
        "off".dimmed()
    }
}

fn idle_note(enabled: bool, has_period: bool) -> String {
    if enabled && !has_period {
        format!(" {}", "[no timer: interval must be positive]".yellow())
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_touches_only_given_fields() {
        let mut config = AppConfig::new();
        config.extra.insert("language".into(), serde_json::json!("en"));

        ConfigUpdate { auto_sync: Some(true), sync_interval: Some(30), ..Default::default() }
            .apply_to(&mut config);

        assert!(config.auto_sync);
        assert_eq!(config.sync_interval, 30);
        assert!(!config.auto_refresh);
        assert_eq!(config.refresh_interval, 15);
        assert_eq!(config.extra.get("language"), Some(&serde_json::json!("en")));
    }

    #[test]
    fn test_empty_update() {
        assert!(ConfigUpdate::default().is_empty());
        assert!(!ConfigUpdate { refresh_interval: Some(0), ..Default::default() }.is_empty());
    }
}
