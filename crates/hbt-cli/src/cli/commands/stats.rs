//! Stats command handler.

use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table};
use hbt_core::config::Config;
use hbt_core::dashboard::StatsView;

pub async fn show(config: &Config) -> Result<()> {
    let (_session, client) = super::connect_authenticated(config)?;

    let stats = client.stats().await.context("fetch stats")?;

    // The streak endpoint is decoration; a failure falls back to zero
    // rather than hiding the stats that did arrive.
    let streak = match client.global_streak().await {
        Ok(streak) => streak,
        Err(err) => {
            tracing::debug!(error = %err, "global streak fetch failed");
            hbt_core::api::StreakResponse::default()
        }
    };

    let view = StatsView::from_responses(&stats, &streak);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Habits created", &view.total_habits.to_string()]);
    table.add_row(vec!["Total completions", &view.total_completed.to_string()]);
    table.add_row(vec!["Current streak", &format!("{} days", view.total_streak)]);
    table.add_row(vec!["Longest streak", &format!("{} days", view.longest_streak)]);
    println!("{table}");
    Ok(())
}
