//! Error types for habit API calls.

use std::fmt;

use serde_json::Value;

/// Categories of API errors for consistent handling at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Network/transport failure (connect, timeout, broken body)
    Transport,
    /// Server-reported error (4xx/5xx with an optional `{error}` body)
    Status,
    /// Resource missing (404 on fetch/update/delete by id)
    NotFound,
    /// Failed to decode a response body
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Status => write!(f, "status"),
            ApiErrorKind::NotFound => write!(f, "not_found"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from a habit API call.
///
/// Never propagated past the command call site; each error produces
/// exactly one user-facing message.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// HTTP status code, when the server answered at all
    pub status: Option<u16>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Creates a transport error from a reqwest failure.
    pub fn transport(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Could not reach the server".to_string()
        } else {
            "Request failed".to_string()
        };
        Self::new(ApiErrorKind::Transport, message)
    }

    /// Creates an error from a non-success HTTP status.
    ///
    /// Extracts the server's `{"error": "..."}` message when present and
    /// falls back to a generic message otherwise. 404 maps to `NotFound`.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = if status == 404 {
            ApiErrorKind::NotFound
        } else {
            ApiErrorKind::Status
        };

        let message = extract_error_message(body)
            .unwrap_or_else(|| format!("Request failed (HTTP {status})"));

        Self {
            kind,
            message,
            status: Some(status),
        }
    }

    /// Creates a parse error for an undecodable response body.
    pub fn parse(context: &str) -> Self {
        Self::new(
            ApiErrorKind::Parse,
            format!("Failed to decode {context} response"),
        )
    }
}

/// Pulls the `error` field out of a JSON error body, if it has one.
fn extract_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body).ok()?;
    json.get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
