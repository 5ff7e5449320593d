//! CLI command handlers.

use anyhow::{Context, Result};
use hbt_core::api::{ApiClient, CredentialProvider};
use hbt_core::config::Config;
use hbt_core::session::SessionManager;

pub mod ai;
pub mod auth;
pub mod config;
pub mod habits;
pub mod stats;

/// Restores the stored session and builds an API client against the
/// configured base URL. Every networked command starts here.
pub(crate) fn connect(config: &Config) -> Result<(SessionManager, ApiClient)> {
    let credentials = CredentialProvider::new();
    let session = SessionManager::initialize(credentials.clone()).context("restore session")?;
    let client = ApiClient::from_config(config, credentials).context("build API client")?;
    Ok((session, client))
}

/// Like [`connect`], but fails fast when no token is stored.
pub(crate) fn connect_authenticated(config: &Config) -> Result<(SessionManager, ApiClient)> {
    let (session, client) = connect(config)?;
    if !session.is_authenticated() {
        anyhow::bail!("Not logged in. Run `hbt login` first.");
    }
    Ok((session, client))
}
