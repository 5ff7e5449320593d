//! Habit command handlers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table};
use hbt_core::api::{Frequency, Habit, HabitDraft, HabitUpdate};
use hbt_core::config::Config;
use hbt_core::dashboard::Reconciler;

pub async fn list(config: &Config) -> Result<()> {
    let (_session, client) = super::connect_authenticated(config)?;

    let mut reconciler = Reconciler::new(client, config.refresh_delay());
    reconciler.refresh().await.context("fetch habits")?;

    let state = reconciler.state();
    if state.habits().is_empty() {
        println!("No habits yet. Create one with `hbt habits add <title>`.");
        return Ok(());
    }

    println!("{}", render_habits(state.ordered()));
    println!(
        "{} pending today, {} done, global streak {}",
        state.pending_today(),
        state.completed_today(),
        state.global_streak()
    );
    Ok(())
}

pub async fn add(
    config: &Config,
    title: &str,
    description: Option<&str>,
    frequency: &str,
    target: u32,
) -> Result<()> {
    let (_session, client) = super::connect_authenticated(config)?;

    let frequency: Frequency = frequency.parse().map_err(anyhow::Error::msg)?;
    let draft = HabitDraft::new(title, description.unwrap_or_default(), frequency, target);
    let habit = client.create_habit(&draft).await.context("create habit")?;

    println!("✓ Created habit {} ({})", habit.title, habit.id);
    Ok(())
}

pub struct EditArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub target: Option<u32>,
}

pub async fn edit(config: &Config, id: &str, args: EditArgs) -> Result<()> {
    let (_session, client) = super::connect_authenticated(config)?;

    let frequency = args
        .frequency
        .as_deref()
        .map(str::parse::<Frequency>)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let update = HabitUpdate {
        title: args.title,
        description: args.description,
        frequency,
        target_count: args.target,
    };
    if update.is_empty() {
        anyhow::bail!("Nothing to change. Pass --title, --description, --frequency, or --target.");
    }

    let habit = client
        .update_habit(id, &update)
        .await
        .with_context(|| format!("update habit '{id}'"))?;

    println!("✓ Updated habit {} ({})", habit.title, habit.id);
    Ok(())
}

/// Two-step delete: arm, confirm on the terminal, then fire. The list
/// shown afterwards is the server's post-delete truth.
pub async fn rm(config: &Config, id: &str, yes: bool) -> Result<()> {
    let (_session, client) = super::connect_authenticated(config)?;

    let mut reconciler = Reconciler::new(client, config.refresh_delay());
    reconciler.refresh().await.context("fetch habits")?;

    let Some(habit) = reconciler.state().habit(id) else {
        anyhow::bail!("No habit with id '{id}'");
    };
    let title = habit.title.clone();

    reconciler.state_mut().request_delete(id);

    if !yes && !confirm(&format!("Delete habit '{title}'? This cannot be undone."))? {
        reconciler.state_mut().cancel_delete();
        println!("Cancelled; nothing deleted.");
        return Ok(());
    }

    reconciler
        .confirm_delete()
        .await
        .with_context(|| format!("delete habit '{id}'"))?;

    println!("✓ Deleted habit '{title}'");
    println!("{} habits remaining", reconciler.state().habits().len());
    Ok(())
}

pub async fn done(config: &Config, id: &str, notes: Option<&str>) -> Result<()> {
    let (_session, client) = super::connect_authenticated(config)?;

    let mut reconciler = Reconciler::new(client, config.refresh_delay());
    reconciler.refresh().await.context("fetch habits")?;

    let Some(habit) = reconciler.state().habit(id) else {
        anyhow::bail!("No habit with id '{id}'");
    };
    if !reconciler.state().can_complete(id) {
        println!("'{}' is already completed for today.", habit.title);
        return Ok(());
    }

    let patch = reconciler
        .complete_habit(id, notes)
        .await
        .with_context(|| format!("complete habit '{id}'"))?;

    if patch.is_completed_today {
        println!("✓ Completed! Current streak: {} days", patch.current_streak);
    } else {
        // Multi-count habit with slots left; show progress from the
        // refreshed state so target_count is the server's number.
        let target = reconciler
            .state()
            .habit(id)
            .map_or(0, |h| h.target_count);
        println!("✓ Logged {}/{} for today", patch.today_completions, target);
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().lock().read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}

fn render_habits(habits: Vec<&Habit>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Title", "Frequency", "Today", "Streak", "Best"]);

    for habit in habits {
        let today = if habit.is_completed_now() {
            "✓".to_string()
        } else {
            format!("{}/{}", habit.today_completions, habit.target_count)
        };
        table.add_row(vec![
            habit.id.clone(),
            habit.title.clone(),
            habit.frequency.to_string(),
            today,
            habit.current_streak.to_string(),
            habit.longest_streak.to_string(),
        ]);
    }
    table
}
