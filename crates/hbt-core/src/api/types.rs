//! Wire contracts for the habit-tracker API.
//!
//! Every endpoint gets an explicit request/response type. Optional or
//! historically missing wire fields carry `#[serde(default)]` so partial
//! payloads deserialize to explicit defaults instead of failing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How often a habit is meant to be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!(
                "Unknown frequency: {value} (expected daily, weekly, or monthly)"
            )),
        }
    }
}

fn default_target_count() -> u32 {
    1
}

/// A habit as the server reports it.
///
/// Replaced wholesale on each list fetch; the completion fields are
/// patched individually from [`CompletionPatch`] after a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_target_count")]
    pub target_count: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub today_completions: u32,
    #[serde(default)]
    pub is_completed_today: bool,
    #[serde(default)]
    pub period_completions: u32,
    #[serde(default)]
    pub is_completed_period: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Habit {
    /// Whether this habit counts as completed for its current period.
    ///
    /// Monthly habits track completion within the month; daily and weekly
    /// habits use the today flag.
    pub fn is_completed_now(&self) -> bool {
        match self.frequency {
            Frequency::Monthly => self.is_completed_period,
            _ => self.is_completed_today,
        }
    }
}

/// Authenticated user identity from login/register responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response to login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Fields for creating a habit.
#[derive(Debug, Clone, Serialize)]
pub struct HabitDraft {
    pub title: String,
    pub description: String,
    pub frequency: Frequency,
    pub target_count: u32,
}

/// Maximum accepted description length; longer input is truncated
/// client-side before it goes on the wire.
pub(crate) const MAX_DESCRIPTION_LEN: usize = 160;

impl HabitDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        frequency: Frequency,
        target_count: u32,
    ) -> Self {
        let description: String = description.into();
        let description = description
            .trim()
            .chars()
            .take(MAX_DESCRIPTION_LEN)
            .collect();
        Self {
            title: title.into(),
            description,
            frequency,
            target_count: target_count.max(1),
        }
    }
}

/// Partial update for an existing habit. Unset fields are left alone
/// server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HabitUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_count: Option<u32>,
}

impl HabitUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.frequency.is_none()
            && self.target_count.is_none()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CompleteRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}

/// The server-truth fields returned by a successful completion.
///
/// These are applied to the matching in-memory habit exactly as
/// returned, never locally incremented.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionPatch {
    pub id: String,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub today_completions: u32,
    #[serde(default)]
    pub is_completed_today: bool,
}

/// Response to a completion call.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub habit: CompletionPatch,
}

/// Response to a deletion call.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Cumulative per-user statistics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub total_habits_created: u64,
    #[serde(default)]
    pub total_completions: u64,
    #[serde(default)]
    pub longest_daily_streak: u32,
}

/// Global daily streak across all habits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreakResponse {
    #[serde(default)]
    pub current_streak: u32,
}

/// AI-generated insight text.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightResponse {
    #[serde(default)]
    pub insight: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
}

/// One message in the AI chat history.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatEntry {
    pub id: String,
    pub role: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response to sending a chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub assistant: ChatEntry,
}

#[derive(Debug, Serialize)]
pub(crate) struct SuggestionsRequest<'a> {
    pub query: &'a str,
}

/// An AI-suggested habit, addable as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct HabitSuggestion {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_target_count")]
    pub target_count: u32,
}

/// Response to a habit-suggestion query.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionsResponse {
    #[serde(default)]
    pub habits: Vec<HabitSuggestion>,
}
