//! AI command handlers: insights, chat, and habit suggestions.

use anyhow::{Context, Result};
use hbt_core::api::HabitDraft;
use hbt_core::config::Config;

pub async fn insights(config: &Config) -> Result<()> {
    let (_session, client) = super::connect_authenticated(config)?;

    let response = client.insights().await.context("fetch insight")?;
    println!("{}", response.insight);
    Ok(())
}

pub async fn chat(config: &Config, message: &str) -> Result<()> {
    let (_session, client) = super::connect_authenticated(config)?;

    let response = client.send_chat(message).await.context("send message")?;
    println!("{}", response.assistant.text);
    Ok(())
}

pub async fn chat_history(config: &Config) -> Result<()> {
    let (_session, client) = super::connect_authenticated(config)?;

    let entries = client.chat_history().await.context("fetch chat history")?;
    if entries.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }
    for entry in entries {
        match format_timestamp(entry.created_at.as_deref()) {
            Some(when) => println!("[{when}] {}: {}", entry.role, entry.text),
            None => println!("{}: {}", entry.role, entry.text),
        }
    }
    Ok(())
}

/// Renders a server timestamp for display; unparseable input is dropped
/// rather than shown raw.
fn format_timestamp(raw: Option<&str>) -> Option<String> {
    let parsed = chrono::DateTime::parse_from_rfc3339(raw?).ok()?;
    Some(parsed.format("%Y-%m-%d %H:%M").to_string())
}

pub async fn suggest(config: &Config, query: &str, add: Option<usize>) -> Result<()> {
    let (_session, client) = super::connect_authenticated(config)?;

    let response = client
        .generate_habits(query)
        .await
        .context("generate suggestions")?;
    if response.habits.is_empty() {
        println!("No suggestions for that. Try a broader goal.");
        return Ok(());
    }

    for (i, suggestion) in response.habits.iter().enumerate() {
        println!(
            "{}. {} ({}, {}x)",
            i + 1,
            suggestion.title,
            suggestion.frequency,
            suggestion.target_count
        );
        if let Some(description) = &suggestion.description {
            println!("   {description}");
        }
    }

    let Some(n) = add else {
        return Ok(());
    };
    let suggestion = response
        .habits
        .get(n.checked_sub(1).context("--add is 1-based")?)
        .with_context(|| format!("no suggestion #{n}"))?;

    let draft = HabitDraft::new(
        suggestion.title.clone(),
        suggestion.description.clone().unwrap_or_default(),
        suggestion.frequency,
        suggestion.target_count,
    );
    let habit = client.create_habit(&draft).await.context("create habit")?;
    println!("✓ Created habit {} ({})", habit.title, habit.id);
    Ok(())
}
