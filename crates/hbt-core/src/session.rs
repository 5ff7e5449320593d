//! Bearer-token session lifecycle.
//!
//! Stores the credential in `<HBT_HOME>/session.json` with restricted
//! permissions (0600). Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, CredentialProvider, UserProfile};
use crate::config::paths;

/// Persisted session state.
///
/// Only the token survives a process restart; the user identity is
/// re-learned from the next login. A store with no token means logged out.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TokenStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl TokenStore {
    /// Returns the path to the session file.
    pub fn store_path() -> PathBuf {
        paths::session_path()
    }

    /// Loads the session store from disk.
    /// Returns an empty store if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn load() -> Result<Self> {
        let path = Self::store_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", path.display()))
    }

    /// Saves the session store to disk with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn save(&self) -> Result<()> {
        let path = Self::store_path();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize session")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }

    /// Removes the persisted session. Missing file counts as cleared.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn clear() -> Result<bool> {
        let path = Self::store_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        Ok(true)
    }
}

/// Owns the credential lifecycle: startup restore, login/register,
/// logout, and activation of the shared [`CredentialProvider`].
pub struct SessionManager {
    credentials: CredentialProvider,
    user: Option<UserProfile>,
}

impl SessionManager {
    /// Restores a persisted session, priming the credential provider.
    ///
    /// Runs once per process start, before any protected call. With a
    /// stored token the session is authenticated immediately — no network
    /// round-trip — but the user identity stays unknown until the next
    /// login populates it.
    ///
    /// # Errors
    /// Returns an error if the session file exists but cannot be read.
    pub fn initialize(credentials: CredentialProvider) -> Result<Self> {
        let store = TokenStore::load()?;
        credentials.set(store.token);
        Ok(Self {
            credentials,
            user: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    /// The authenticated user, when known in this process.
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Masked form of the active token for display, if any.
    pub fn masked_token(&self) -> Option<String> {
        self.credentials.get().map(|token| mask_token(&token))
    }

    /// Logs in against the remote API.
    ///
    /// On success the token is persisted, activated for all future calls,
    /// and the user identity recorded. On failure nothing changes: the
    /// prior credential (persisted and active) is left untouched and the
    /// server's error message is surfaced to the caller.
    pub async fn login(
        &mut self,
        client: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<UserProfile> {
        let response = client.login(username, password).await?;
        self.activate(response.access_token, response.user.clone())?;
        Ok(response.user)
    }

    /// Registers a new account; symmetric to [`Self::login`].
    pub async fn register(
        &mut self,
        client: &ApiClient,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile> {
        let response = client.register(username, email, password).await?;
        self.activate(response.access_token, response.user.clone())?;
        Ok(response.user)
    }

    /// Clears the persisted credential, the active authorization, and the
    /// session. Unconditional and infallible: a disk failure is logged
    /// and swallowed, never surfaced. Idempotent when already logged out.
    pub fn logout(&mut self) {
        self.credentials.set(None);
        self.user = None;
        if let Err(err) = TokenStore::clear() {
            tracing::warn!(error = %err, "failed to clear persisted session");
        }
    }

    /// Persists and activates a freshly issued credential.
    fn activate(&mut self, token: String, user: UserProfile) -> Result<()> {
        TokenStore {
            token: Some(token.clone()),
        }
        .save()?;
        self.credentials.set(Some(token));
        self.user = Some(user);
        Ok(())
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Token store serialization roundtrip (in-memory, no fs).
    #[test]
    fn test_token_store_serialization() {
        let store = TokenStore {
            token: Some("bearer-token".to_string()),
        };

        let json = serde_json::to_string(&store).unwrap();
        let loaded: TokenStore = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.token.as_deref(), Some("bearer-token"));
    }

    /// An empty store serializes without a token key at all.
    #[test]
    fn test_empty_store_omits_token() {
        let json = serde_json::to_string(&TokenStore::default()).unwrap();
        assert_eq!(json, "{}");

        let loaded: TokenStore = serde_json::from_str("{}").unwrap();
        assert!(loaded.token.is_none());
    }

    /// Token masking.
    #[test]
    fn test_mask_token() {
        assert_eq!(
            mask_token("a-rather-long-bearer-token"),
            "a-rather-lon..."
        );
        assert_eq!(mask_token("short"), "***");
    }
}
