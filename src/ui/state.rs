//! The view state and its transitions.
//!
//! [`ViewState`] is the single source of truth for what the user sees. Every
//! mutation goes through a named transition; network work is split into a
//! `begin_*` half that flips loading flags and a `*_finished` half that
//! applies the response.

use crate::client::ClientError;
use crate::models::{sort_newest_first, Goal};

/// Fallback shown when a refresh fails without a usable message.
const LOAD_FAILED: &str = "Failed to load goals";

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Text currently in the goal input.
    pub input: String,
    pub submitting: bool,
    /// Last error shown under the form.
    pub error: Option<String>,
    /// Goal returned by the most recent successful submit.
    pub current_goal: Option<Goal>,
    /// All known goals, newest first.
    pub goals: Vec<Goal>,
    pub loading_goals: bool,
    /// Whether the list panel shows goals or the refresh prompt.
    pub show_goals: bool,
    /// Goal picked from the list, distinct from `current_goal`.
    pub selected_goal: Option<Goal>,
    scroll_to_top: bool,
    backend_url: String,
}

impl ViewState {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..Self::default()
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// The goal occupying the detail panel, preferring a fresh creation.
    pub fn displayed_goal(&self) -> Option<&Goal> {
        self.current_goal.as_ref().or(self.selected_goal.as_ref())
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.input.trim().is_empty()
    }

    pub fn can_refresh(&self) -> bool {
        !self.loading_goals
    }

    // ============================================================
    // Mount
    // ============================================================

    pub fn begin_mount(&mut self) {
        self.loading_goals = true;
    }

    /// Apply the initial prefetch. Failures are swallowed.
    pub fn mount_finished(&mut self, result: Result<Vec<Goal>, ClientError>) {
        match result {
            Ok(goals) => {
                self.store_goals(goals);
                self.show_goals = true;
            }
            Err(e) => tracing::debug!(error = %e, "initial goal fetch failed"),
        }
        self.loading_goals = false;
    }

    // ============================================================
    // Submit
    // ============================================================

    /// Start a submit, returning the text to send.
    ///
    /// Returns `None` without touching state when the input is blank or a
    /// submit is already running.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        self.error = None;
        self.current_goal = None;
        Some(self.input.clone())
    }

    pub fn goal_created(&mut self, goal: Goal) {
        self.current_goal = Some(goal);
        self.selected_goal = None;
        self.input.clear();
    }

    /// Apply the list fetched right after a successful create.
    pub fn submit_list_loaded(&mut self, goals: Vec<Goal>) {
        self.store_goals(goals);
        self.show_goals = true;
    }

    pub fn submit_failed(&mut self, err: &ClientError) {
        let fallback = format!(
            "Failed to create goal. Make sure the backend is running on {}",
            self.backend_url
        );
        self.error = Some(error_message(err, &fallback));
    }

    pub fn end_submit(&mut self) {
        self.submitting = false;
    }

    // ============================================================
    // Refresh
    // ============================================================

    /// Start a manual refresh. Returns false while a list load is in flight.
    pub fn begin_refresh(&mut self) -> bool {
        if !self.can_refresh() {
            return false;
        }
        self.loading_goals = true;
        true
    }

    pub fn refresh_finished(&mut self, result: Result<Vec<Goal>, ClientError>) {
        match result {
            Ok(goals) => {
                self.store_goals(goals);
                self.show_goals = true;
                if self.selected_goal.is_none() {
                    self.selected_goal = self.goals.first().cloned();
                }
            }
            Err(e) => self.error = Some(error_message(&e, LOAD_FAILED)),
        }
        self.loading_goals = false;
    }

    // ============================================================
    // Local-only transitions
    // ============================================================

    /// Show a goal from the list in the detail panel.
    ///
    /// Returns false, leaving state untouched, if the id is not in the list.
    pub fn select_goal(&mut self, id: i64) -> bool {
        let Some(goal) = self.goals.iter().find(|g| g.id == id) else {
            return false;
        };
        self.selected_goal = Some(goal.clone());
        self.current_goal = None;
        self.scroll_to_top = true;
        true
    }

    pub fn close_detail(&mut self) {
        self.selected_goal = None;
    }

    pub fn hide_goals(&mut self) {
        self.show_goals = false;
        self.selected_goal = None;
    }

    /// Consume a pending scroll-to-top request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }

    fn store_goals(&mut self, mut goals: Vec<Goal>) {
        sort_newest_first(&mut goals);
        self.goals = goals;
    }
}

fn error_message(err: &ClientError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
