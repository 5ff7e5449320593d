//! Auth command handlers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use hbt_core::config::Config;
use hbt_core::session::{SessionManager, TokenStore};

pub async fn login(config: &Config, username: &str, password: Option<&str>) -> Result<()> {
    let (mut session, client) = super::connect(config)?;

    if let Some(masked) = session.masked_token() {
        println!("Already logged in (token: {masked}). Logging in again replaces the session.");
    }

    let password = resolve_password(password)?;
    let user = session
        .login(&client, username, &password)
        .await
        .context("login failed")?;

    println!("✓ Logged in as {}", user.username);
    println!("  Session saved to: {}", TokenStore::store_path().display());
    Ok(())
}

pub async fn register(
    config: &Config,
    username: &str,
    email: &str,
    password: Option<&str>,
) -> Result<()> {
    let (mut session, client) = super::connect(config)?;

    let password = resolve_password(password)?;
    let user = session
        .register(&client, username, email, &password)
        .await
        .context("registration failed")?;

    println!("✓ Registered and logged in as {}", user.username);
    println!("  Session saved to: {}", TokenStore::store_path().display());
    Ok(())
}

pub fn logout() -> Result<()> {
    let credentials = hbt_core::api::CredentialProvider::new();
    let mut session = SessionManager::initialize(credentials).context("restore session")?;

    let had_token = session.is_authenticated();
    session.logout();

    if had_token {
        println!("✓ Logged out");
        println!("  Session removed from: {}", TokenStore::store_path().display());
    } else {
        println!("Not logged in (no session found).");
    }
    Ok(())
}

pub async fn whoami(config: &Config) -> Result<()> {
    let (session, client) = super::connect(config)?;

    if !session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }

    let masked = session.masked_token().unwrap_or_else(|| "***".to_string());
    println!("Logged in (token: {masked})");
    match client.health().await {
        Ok(()) => println!("Server reachable at {}", client.base_url()),
        Err(err) => println!("Server check failed: {err}"),
    }
    Ok(())
}

/// Uses the flag value when given, otherwise prompts on stdin.
fn resolve_password(flag: Option<&str>) -> Result<String> {
    if let Some(password) = flag {
        return Ok(password.to_string());
    }

    print!("Password: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let password = input.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }
    Ok(password)
}
