use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

use antigravity_client::AntigravityClient;
use antigravity_core::modules::aggregator::{
    self, CLAUDE_SONNET, GEMINI_PRO_HIGH, GEMINI_PRO_IMAGE, LOW_QUOTA_THRESHOLD,
};
use antigravity_core::modules::ranking::{self, best_accounts, filter_accounts, FilterCounts};
use antigravity_core::{AccountFilter, SelectionState};
use antigravity_types::{Account, DashboardStats, QuotaData, RefreshStats};

pub async fn show_stats(client: &AntigravityClient, json: bool) -> Result<()> {
    let accounts = client.list_accounts().await.context("Failed to list accounts")?;
    let stats = aggregator::aggregate(&accounts);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", stats_table(&stats));
    Ok(())
}

pub fn stats_table(stats: &DashboardStats) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Accounts"), Cell::new(stats.total_accounts)]);
    table.add_row(vec![Cell::new("Avg Gemini"), percent_cell(Some(stats.avg_gemini_quota))]);
    table.add_row(vec![
        Cell::new("Avg Gemini Image"),
        percent_cell(Some(stats.avg_gemini_image_quota)),
    ]);
    table.add_row(vec![Cell::new("Avg Claude"), percent_cell(Some(stats.avg_claude_quota))]);

    let low = Cell::new(stats.low_quota_count);
    let low = if stats.low_quota_count > 0 { low.fg(Color::Red) } else { low.fg(Color::Green) };
    table.add_row(vec![Cell::new(format!("Low quota (<{LOW_QUOTA_THRESHOLD}%)")), low]);
    table.add_row(vec![
        Cell::new("Ultra / Pro / Free"),
        Cell::new(format!("{} / {} / {}", stats.ultra_count, stats.pro_count, stats.free_count)),
    ]);
    table
}

pub async fn list_accounts(
    client: &AntigravityClient,
    search: Option<String>,
    filter: AccountFilter,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let accounts = client.list_accounts().await.context("Failed to list accounts")?;
    let current = client.current_account().await.context("Failed to load current account")?;

    let mut view = SelectionState::new();
    view.set_current_account(current.map(|a| a.id));
    view.set_search_query(search.unwrap_or_default());
    view.set_filter(filter);

    let shown: Vec<&Account> = match top {
        Some(limit) => best_accounts(&accounts, limit),
        None => filter_accounts(&accounts, view.search_query(), view.filter()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("{}", "No accounts found.".yellow());
        return Ok(());
    }

    println!("{}", accounts_table(&shown, view.current_account_id()));

    let searched = accounts.iter().filter(|a| ranking::matches_query(a, view.search_query()));
    let counts = FilterCounts::from_accounts(searched);
    println!(
        "\n{} shown · all {} · pro {} · ultra {} · free {}",
        shown.len(),
        counts.all,
        counts.pro,
        counts.ultra,
        counts.free
    );
    Ok(())
}

pub fn accounts_table(accounts: &[&Account], current_id: Option<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["", "Email", "Tier", "Gemini", "Image", "Claude", "Resets", "Status"]);

    let now = chrono::Utc::now();
    for acc in accounts {
        let marker = if current_id == Some(acc.id.as_str()) { "●" } else { "" };
        let pct = |model: &str| acc.quota.as_ref().and_then(|q| q.percentage_of(model));
        let status = if acc.is_forbidden() {
            Cell::new("Forbidden").fg(Color::Red)
        } else if !acc.is_enabled() {
            Cell::new("Disabled").fg(Color::Red)
        } else {
            Cell::new("Active").fg(Color::Green)
        };

        table.add_row(vec![
            Cell::new(marker).fg(Color::Green),
            Cell::new(&acc.email),
            Cell::new(acc.tier().label()),
            percent_cell(pct(GEMINI_PRO_HIGH)),
            percent_cell(pct(GEMINI_PRO_IMAGE)),
            percent_cell(pct(CLAUDE_SONNET)),
            Cell::new(next_reset_label(acc, now)),
            status,
        ]);
    }
    table
}

pub async fn refresh(client: &AntigravityClient, identifier: Option<String>) -> Result<()> {
    let Some(identifier) = identifier else {
        println!("{}", "Refreshing quota for all accounts...".cyan());
        let stats = client.refresh_all_quotas().await.context("Refresh failed")?;
        print_refresh_stats(&stats);
        return Ok(());
    };

    let accounts = client.list_accounts().await.context("Failed to list accounts")?;
    let mut acc = accounts
        .into_iter()
        .find(|a| a.email == identifier || a.id == identifier)
        .context("Account not found")?;

    println!("{}", format!("Refreshing quota for {}...", acc.email).cyan());
    let quota = client.fetch_quota(&acc.id).await.context("Refresh failed")?;
    println!("{}", quota_table(&quota));
    acc.replace_quota(quota);
    println!("{}", accounts_table(&[&acc], None));
    println!("{} Quota refreshed for {}", "✓".green(), acc.email.green());
    Ok(())
}

fn print_refresh_stats(stats: &RefreshStats) {
    let summary = format!("{}/{} accounts refreshed", stats.success, stats.total);
    if stats.is_clean() {
        println!("{} {}", "✓".green(), summary.green());
    } else {
        println!("{} {} ({} failed)", "!".yellow(), summary.yellow(), stats.failed);
        for detail in &stats.details {
            println!("  {} {}", "-".red(), detail);
        }
    }
}

fn quota_table(quota: &QuotaData) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Model", "Remaining", "Resets"]);

    let now = chrono::Utc::now();
    for model in &quota.models {
        let resets = model
            .seconds_until_reset(now)
            .map_or_else(|| "-".to_string(), format_countdown);
        table.add_row(vec![
            Cell::new(&model.name),
            percent_cell(Some(model.percentage)),
            Cell::new(resets),
        ]);
    }
    table
}

pub async fn sync(client: &AntigravityClient) -> Result<()> {
    match client.sync_account_from_db().await.context("Sync failed")? {
        Some(acc) => println!("{} Active account synced: {}", "✓".green(), acc.email.green()),
        None => println!("{}", "Active account already up to date.".cyan()),
    }
    Ok(())
}

fn percent_cell(value: Option<i32>) -> Cell {
    match value {
        None => Cell::new("-").fg(Color::DarkGrey),
        Some(pct) => {
            let color = match pct {
                p if p >= 50 => Color::Green,
                p if p >= LOW_QUOTA_THRESHOLD => Color::Yellow,
                _ => Color::Red,
            };
            Cell::new(format!("{pct}%")).fg(color)
        },
    }
}

fn next_reset_label(acc: &Account, now: chrono::DateTime<chrono::Utc>) -> String {
    acc.quota
        .as_ref()
        .and_then(QuotaData::next_reset)
        .map_or_else(|| "-".to_string(), |at| format_countdown((at - now).num_seconds().max(0)))
}

fn format_countdown(secs: i64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    match (hours, minutes) {
        (0, 0) => "now".to_string(),
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}
