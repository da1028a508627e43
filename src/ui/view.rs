//! Pure derivation of what to display from a [`ViewState`].

use crate::models::{parse_timestamp, Goal};

use super::state::ViewState;

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub form: FormView,
    pub error: Option<String>,
    pub detail: Option<DetailView>,
    pub goals: GoalListView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub input: String,
    pub submitting: bool,
    pub can_submit: bool,
}

/// Which state slot fed the detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    Created,
    Selected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub goal_id: i64,
    pub goal_text: String,
    pub complexity_score: f64,
    pub score_label: String,
    pub source: DetailSource,
    pub steps: Vec<StepView>,
}

impl DetailView {
    pub fn from_goal(goal: &Goal, source: DetailSource) -> Self {
        Self {
            goal_id: goal.id,
            goal_text: goal.goal_text.clone(),
            complexity_score: goal.complexity_score,
            score_label: format_score(goal.complexity_score),
            source,
            steps: goal
                .ordered_tasks()
                .into_iter()
                .map(|t| StepView {
                    order: t.order,
                    text: t.task_text.clone(),
                })
                .collect(),
        }
    }

    /// Only a goal picked from the list can be dismissed.
    pub fn closable(&self) -> bool {
        self.source == DetailSource::Selected
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub order: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalListView {
    pub headline: String,
    pub loading: bool,
    pub can_hide: bool,
    pub body: GoalListBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GoalListBody {
    /// The panel is hidden; prompt the user to refresh.
    RefreshPrompt,
    /// The panel is visible but there are no goals.
    Empty,
    Goals(Vec<GoalSummary>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalSummary {
    pub id: i64,
    pub goal_text: String,
    pub score_label: String,
    pub created_on: String,
    pub step_count: usize,
    pub selected: bool,
}

impl GoalSummary {
    pub fn from_goal(goal: &Goal, selected: bool) -> Self {
        Self {
            id: goal.id,
            goal_text: goal.goal_text.clone(),
            score_label: format_score(goal.complexity_score),
            created_on: format_created_on(&goal.created_at),
            step_count: goal.tasks.len(),
            selected,
        }
    }
}

/// Derive the view model. Called after every transition.
pub fn derive(state: &ViewState) -> ViewModel {
    let detail = match (&state.current_goal, &state.selected_goal) {
        (Some(goal), _) => Some(DetailView::from_goal(goal, DetailSource::Created)),
        (None, Some(goal)) => Some(DetailView::from_goal(goal, DetailSource::Selected)),
        (None, None) => None,
    };

    let selected_id = state.selected_goal.as_ref().map(|g| g.id);
    let body = if !state.show_goals {
        GoalListBody::RefreshPrompt
    } else if state.goals.is_empty() {
        GoalListBody::Empty
    } else {
        GoalListBody::Goals(
            state
                .goals
                .iter()
                .map(|g| GoalSummary::from_goal(g, selected_id == Some(g.id)))
                .collect(),
        )
    };

    ViewModel {
        form: FormView {
            input: state.input.clone(),
            submitting: state.submitting,
            can_submit: state.can_submit(),
        },
        error: state.error.clone(),
        detail,
        goals: GoalListView {
            headline: list_headline(state.goals.len()),
            loading: state.loading_goals,
            can_hide: state.show_goals,
            body,
        },
    }
}

pub fn list_headline(count: usize) -> String {
    match count {
        0 => "Your goal breakdowns will appear here".to_string(),
        1 => "1 goal broken down and ready to achieve".to_string(),
        n => format!("{} goals broken down and ready to achieve", n),
    }
}

pub fn format_score(score: f64) -> String {
    format!("{:.1}/10", score)
}

/// Format a creation timestamp as e.g. `Mar 5, 2024`, or `Invalid Date`.
pub fn format_created_on(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => "Invalid Date".to_string(),
    }
}
