use serde::{Deserialize, Serialize};

/// One actionable step within a goal's breakdown.
///
/// `order` defines the display sequence. Values are positive but not
/// necessarily contiguous or zero-based, so callers sort by `order` rather
/// than trusting array position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub task_text: String,
    pub order: i64,
}
