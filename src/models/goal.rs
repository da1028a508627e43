use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::Task;

/// A user-submitted objective along with its breakdown.
///
/// Goals are immutable from the client's point of view: one is created per
/// submit and never updated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: i64,
    pub goal_text: String,
    /// Backend-computed difficulty rating, documented as 0.0 to 10.0.
    pub complexity_score: f64,
    /// Creation timestamp exactly as the backend sent it.
    pub created_at: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Goal {
    /// Parsed creation time, or `None` when the backend value is unreadable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Tasks in display order (ascending `order`, stable on ties).
    pub fn ordered_tasks(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().collect();
        tasks.sort_by_key(|t| t.order);
        tasks
    }
}

/// Request body for creating a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGoalInput {
    pub goal_text: String,
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339, naive ISO date-times (read as UTC, with either a `T` or a
/// space separator) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Sort goals newest first.
///
/// The sort is stable. Goals whose timestamp cannot be parsed go after every
/// dated goal, keeping their relative order.
pub fn sort_newest_first(goals: &mut [Goal]) {
    goals.sort_by_cached_key(|goal| std::cmp::Reverse(goal.created_at()));
}
