//! Typed HTTP client over the habit-tracker API.

use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiResult};
use super::types::{
    AuthResponse, ChatEntry, ChatRequest, ChatResponse, CompleteRequest, CompletionResponse,
    DeleteResponse, Habit, HabitDraft, HabitUpdate, InsightResponse, LoginRequest,
    RegisterRequest, StatsResponse, StreakResponse, SuggestionsRequest, SuggestionsResponse,
};
use crate::config::Config;

/// Standard User-Agent header for hbt API requests.
const USER_AGENT: &str = concat!("hbt/", env!("CARGO_PKG_VERSION"));

/// Shared holder of the current bearer credential.
///
/// There is exactly one of these per process, created alongside the
/// session manager and injected into the client at construction. Every
/// outgoing call reads it at send time, so activating or clearing a
/// credential takes effect for all subsequent requests at once — no
/// call can go out with a stale default.
#[derive(Debug, Clone, Default)]
pub struct CredentialProvider {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active credential. `None` deactivates authorization.
    pub fn set(&self, token: Option<String>) {
        let mut guard = self.token.write().expect("credential lock poisoned");
        *guard = token;
    }

    /// Returns a copy of the active credential, if any.
    pub fn get(&self) -> Option<String> {
        self.token.read().expect("credential lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .expect("credential lock poisoned")
            .is_some()
    }
}

/// HTTP client for the habit-tracker API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialProvider,
}

impl ApiClient {
    /// Creates a client for the given base URL and credential provider.
    pub fn new(base_url: impl Into<String>, credentials: CredentialProvider) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Creates a client from config (base URL resolution + request timeout).
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn from_config(config: &Config, credentials: CredentialProvider) -> Result<Self> {
        let base_url = config.effective_base_url()?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn credentials(&self) -> &CredentialProvider {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    /// Exchanges username/password for a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AuthResponse> {
        self.post("/api/login", &LoginRequest { username, password })
            .await
    }

    /// Registers a new account; returns a token like login does.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthResponse> {
        self.post(
            "/api/register",
            &RegisterRequest {
                username,
                email,
                password,
            },
        )
        .await
    }

    /// Connectivity probe; any 2xx means the backend is reachable.
    pub async fn health(&self) -> ApiResult<()> {
        let response = self
            .request(reqwest::Method::GET, "/api/test")
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    // ------------------------------------------------------------------
    // Habits
    // ------------------------------------------------------------------

    pub async fn list_habits(&self) -> ApiResult<Vec<Habit>> {
        self.get("/api/habits/").await
    }

    pub async fn create_habit(&self, draft: &HabitDraft) -> ApiResult<Habit> {
        self.post("/api/habits/", draft).await
    }

    pub async fn update_habit(&self, habit_id: &str, update: &HabitUpdate) -> ApiResult<Habit> {
        self.send_json(
            reqwest::Method::PUT,
            &format!("/api/habits/{habit_id}"),
            Some(update),
        )
        .await
    }

    pub async fn delete_habit(&self, habit_id: &str) -> ApiResult<DeleteResponse> {
        self.send_json::<DeleteResponse, ()>(
            reqwest::Method::DELETE,
            &format!("/api/habits/{habit_id}"),
            None,
        )
        .await
    }

    /// Records one completion; the response carries the server-truth
    /// streak/count fields for the patched habit.
    pub async fn complete_habit(
        &self,
        habit_id: &str,
        notes: Option<&str>,
    ) -> ApiResult<CompletionResponse> {
        self.post(
            &format!("/api/habits/{habit_id}/complete"),
            &CompleteRequest { notes },
        )
        .await
    }

    // ------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------

    pub async fn stats(&self) -> ApiResult<StatsResponse> {
        self.get("/api/stats/").await
    }

    pub async fn global_streak(&self) -> ApiResult<StreakResponse> {
        self.get("/api/streak").await
    }

    // ------------------------------------------------------------------
    // AI
    // ------------------------------------------------------------------

    pub async fn insights(&self) -> ApiResult<InsightResponse> {
        self.get("/api/ai/insights").await
    }

    pub async fn send_chat(&self, message: &str) -> ApiResult<ChatResponse> {
        self.post("/api/ai/chat", &ChatRequest { message }).await
    }

    pub async fn chat_history(&self) -> ApiResult<Vec<ChatEntry>> {
        self.get("/api/ai/chat/history").await
    }

    pub async fn generate_habits(&self, query: &str) -> ApiResult<SuggestionsResponse> {
        self.post("/api/ai/generate-habits", &SuggestionsRequest { query })
            .await
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json::<T, ()>(reqwest::Method::GET, path, None)
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.send_json(reqwest::Method::POST, path, Some(body))
            .await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        response.json().await.map_err(|err| {
            tracing::debug!(path, error = %err, "undecodable response body");
            ApiError::parse(path)
        })
    }

    /// Builds a request with the current credential attached, when one is
    /// active.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.credentials.get() {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}
