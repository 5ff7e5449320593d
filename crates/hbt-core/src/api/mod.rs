//! HTTP client for the habit-tracker API.

mod client;
mod error;
mod types;

pub use client::{ApiClient, CredentialProvider};
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use types::{
    AuthResponse, ChatEntry, ChatResponse, CompletionPatch, CompletionResponse, DeleteResponse,
    Frequency, Habit, HabitDraft, HabitSuggestion, HabitUpdate, InsightResponse, StatsResponse,
    StreakResponse, SuggestionsResponse, UserProfile,
};
