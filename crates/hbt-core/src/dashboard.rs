//! Dashboard view model and optimistic mutation reconciliation.
//!
//! The habit list lives in [`DashboardState`], a pure reducer: the
//! server's list replaces it wholesale on every fetch, and a successful
//! completion patches the matching habit with the server-returned fields
//! exactly (never a local increment). [`Reconciler`] drives the async
//! flow around it: mutate, patch, then re-fetch authoritative state after
//! a short fixed delay so concurrent writes (other devices, date
//! rollover) are corrected. The re-fetch is authoritative-wins — the last
//! server response always replaces local state, so a stale fetch can
//! never permanently shadow a newer patch.

use std::time::Duration;

use crate::api::{
    ApiClient, ApiResult, CompletionPatch, Habit, StatsResponse, StreakResponse,
};

/// Combined stats + streak view model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsView {
    pub total_habits: u64,
    pub total_completed: u64,
    pub total_streak: u32,
    pub longest_streak: u32,
}

impl StatsView {
    pub fn from_responses(stats: &StatsResponse, streak: &StreakResponse) -> Self {
        Self {
            total_habits: stats.total_habits_created,
            total_completed: stats.total_completions,
            total_streak: streak.current_streak,
            longest_streak: stats.longest_daily_streak,
        }
    }
}

/// In-memory habit list plus the two-step delete state.
///
/// Mutated only by its owner, one operation at a time; ordering hazards
/// between overlapping fetches are handled by wholesale replacement.
#[derive(Debug, Default)]
pub struct DashboardState {
    habits: Vec<Habit>,
    global_streak: u32,
    pending_delete: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == habit_id)
    }

    pub fn global_streak(&self) -> u32 {
        self.global_streak
    }

    /// Replaces the list wholesale with the server's version.
    pub fn replace_habits(&mut self, habits: Vec<Habit>) {
        self.habits = habits;
    }

    pub fn set_global_streak(&mut self, streak: u32) {
        self.global_streak = streak;
    }

    /// Applies a server-truth completion patch to the matching habit.
    ///
    /// Only the four server-returned fields change; everything else is
    /// left for the authoritative re-fetch. Returns false when no habit
    /// matches (it may have been deleted by a concurrent fetch).
    pub fn apply_completion(&mut self, patch: &CompletionPatch) -> bool {
        let Some(habit) = self.habits.iter_mut().find(|h| h.id == patch.id) else {
            return false;
        };
        habit.current_streak = patch.current_streak;
        habit.longest_streak = patch.longest_streak;
        habit.today_completions = patch.today_completions;
        habit.is_completed_today = patch.is_completed_today;
        true
    }

    /// Idempotency guard: whether another completion may be issued.
    ///
    /// Multi-count habits stay completable until `today_completions`
    /// reaches `target_count`. Unknown ids are not completable.
    pub fn can_complete(&self, habit_id: &str) -> bool {
        self.habit(habit_id)
            .is_some_and(|h| h.today_completions < h.target_count)
    }

    // ------------------------------------------------------------------
    // Two-step delete
    // ------------------------------------------------------------------

    /// Arms a pending delete. No network call happens here.
    pub fn request_delete(&mut self, habit_id: &str) {
        self.pending_delete = Some(habit_id.to_string());
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Confirms the pending delete, returning the id the destructive
    /// call may now target. The caller fires the request.
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    /// Cancels the pending delete; the list is untouched.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    // ------------------------------------------------------------------
    // Derived values
    // ------------------------------------------------------------------

    /// Habits not yet completed for their current period.
    pub fn pending_today(&self) -> usize {
        self.habits.iter().filter(|h| !h.is_completed_now()).count()
    }

    /// Habits completed for their current period.
    pub fn completed_today(&self) -> usize {
        self.habits.iter().filter(|h| h.is_completed_now()).count()
    }

    /// Sum of per-habit current streaks.
    pub fn total_streak(&self) -> u32 {
        self.habits.iter().map(|h| h.current_streak).sum()
    }

    /// Display order: uncompleted habits first, otherwise stable.
    pub fn ordered(&self) -> Vec<&Habit> {
        let mut habits: Vec<&Habit> = self.habits.iter().collect();
        habits.sort_by_key(|h| h.is_completed_now());
        habits
    }
}

/// Drives mutations against the remote API and reconciles the local
/// view afterwards.
pub struct Reconciler {
    client: ApiClient,
    state: DashboardState,
    refresh_delay: Duration,
}

impl Reconciler {
    pub fn new(client: ApiClient, refresh_delay: Duration) -> Self {
        Self {
            client,
            state: DashboardState::new(),
            refresh_delay,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    /// Fetches the habit list and the global streak.
    ///
    /// The list fetch is load-bearing and surfaces its error; the streak
    /// fetch fails silently and keeps the previous value, matching how
    /// the dashboard treats it as decoration.
    pub async fn refresh(&mut self) -> ApiResult<()> {
        let habits = self.client.list_habits().await?;
        self.state.replace_habits(habits);

        match self.client.global_streak().await {
            Ok(streak) => self.state.set_global_streak(streak.current_streak),
            Err(err) => tracing::debug!(error = %err, "global streak fetch failed"),
        }
        Ok(())
    }

    /// Completes a habit and reconciles.
    ///
    /// On success the matching habit is patched with the server-returned
    /// fields immediately. Regardless of the outcome, a full re-fetch
    /// runs after the configured delay; the re-fetch is authoritative and
    /// its own failure is logged, never allowed to mask the completion
    /// result (the worst outcome is a stale view).
    pub async fn complete_habit(
        &mut self,
        habit_id: &str,
        notes: Option<&str>,
    ) -> ApiResult<CompletionPatch> {
        let result = self.client.complete_habit(habit_id, notes).await;

        let outcome = match result {
            Ok(response) => {
                self.state.apply_completion(&response.habit);
                Ok(response.habit)
            }
            Err(err) => Err(err),
        };

        self.delayed_refresh().await;
        outcome
    }

    /// Fires the armed delete, then reconciles.
    ///
    /// Returns `Ok(None)` when no delete was pending (nothing sent).
    /// On success nothing is removed locally; the re-fetch carries the
    /// authoritative list. On failure the prior state stands.
    pub async fn confirm_delete(&mut self) -> ApiResult<Option<String>> {
        let Some(habit_id) = self.state.confirm_delete() else {
            return Ok(None);
        };

        self.client.delete_habit(&habit_id).await?;
        self.delayed_refresh().await;
        Ok(Some(habit_id))
    }

    /// The unconditional post-mutation re-fetch.
    async fn delayed_refresh(&mut self) {
        tokio::time::sleep(self.refresh_delay).await;
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "post-mutation refresh failed; view may be stale");
        }
    }
}
