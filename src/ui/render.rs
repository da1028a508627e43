//! Plain-text rendering of a [`ViewModel`].

use super::view::{DetailView, GoalListBody, GoalListView, GoalSummary, ViewModel};

const BAR_WIDTH: usize = 20;
const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

/// Render a whole frame: form, error banner, detail panel and goal list.
pub fn render(view: &ViewModel) -> String {
    let mut output = String::new();

    output.push_str("Goal Breaker\n");
    output.push_str("============\n\n");

    output.push_str("What do you want to achieve?\n");
    output.push_str("> ");
    output.push_str(&view.form.input);
    output.push('\n');
    if view.form.submitting {
        output.push_str("  AI is breaking down your goal...\n");
    }

    if let Some(ref error) = view.error {
        output.push_str("\n! ");
        output.push_str(error);
        output.push('\n');
    }

    if let Some(ref detail) = view.detail {
        output.push('\n');
        output.push_str(&render_detail(detail));
    }

    output.push('\n');
    output.push_str(&render_goal_list(&view.goals));
    output
}

/// Render the detail panel for one goal.
///
/// Example output:
/// ```text
/// Goal Breakdown
/// Goal: Learn Rust
/// Complexity  ████████████░░░░░░░░ 6.0/10
/// Actionable Steps
///   1. Read the book
///   2. Write a CLI
/// ```
pub fn render_detail(detail: &DetailView) -> String {
    let mut output = String::new();

    output.push_str("Goal Breakdown");
    if detail.closable() {
        output.push_str("  (close to dismiss)");
    }
    output.push('\n');

    output.push_str("Goal: ");
    output.push_str(&indent_continuation(&detail.goal_text, "Goal: ".len()));
    output.push('\n');

    output.push_str("Complexity  ");
    output.push_str(&score_bar(detail.complexity_score));
    output.push(' ');
    output.push_str(&detail.score_label);
    output.push('\n');

    output.push_str("Actionable Steps\n");
    for step in &detail.steps {
        let prefix = format!("  {}. ", step.order);
        output.push_str(&prefix);
        output.push_str(&indent_continuation(&step.text, prefix.len()));
        output.push('\n');
    }
    output
}

/// Render the goal list panel, including its headline.
pub fn render_goal_list(list: &GoalListView) -> String {
    let mut output = String::new();

    output.push_str("All Your Goals\n");
    output.push_str(&list.headline);
    output.push('\n');
    if list.loading {
        output.push_str("  Loading...\n");
    }

    match list.body {
        GoalListBody::RefreshPrompt => {
            output.push_str("  Type \"refresh\" to view all goals\n");
        }
        GoalListBody::Empty => {
            output.push_str("  No goals yet. Create your first goal above to get started!\n");
        }
        GoalListBody::Goals(ref summaries) => {
            for (i, summary) in summaries.iter().enumerate() {
                output.push_str(&render_summary(i + 1, summary));
            }
        }
    }
    output
}

/// Render one list entry, numbered by its position in the list.
pub fn render_summary(position: usize, summary: &GoalSummary) -> String {
    let marker = if summary.selected { '*' } else { ' ' };
    let heading = format!("{}{:>3}. ", marker, position);
    format!(
        "{}{}\n       {} complexity | {} | {} steps | #{}\n",
        heading,
        indent_continuation(&summary.goal_text, heading.len()),
        summary.score_label,
        summary.created_on,
        summary.step_count,
        summary.id,
    )
}

/// Indent every line after the first by `width` spaces, so text containing
/// newlines stays under its label instead of running into the margin.
fn indent_continuation(text: &str, width: usize) -> String {
    let mut lines = text.lines();
    let mut output = lines.next().unwrap_or_default().to_string();
    for line in lines {
        output.push('\n');
        output.push_str(&" ".repeat(width));
        output.push_str(line);
    }
    output
}

/// A fixed-width bar proportional to a 0-10 score. Out-of-range scores are clamped.
fn score_bar(score: f64) -> String {
    let ratio = if score.is_finite() {
        (score / 10.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(BAR_WIDTH - filled));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::view::{DetailSource, FormView, StepView};

    fn detail(source: DetailSource) -> DetailView {
        DetailView {
            goal_id: 1,
            goal_text: "Learn Rust".to_string(),
            complexity_score: 6.0,
            score_label: "6.0/10".to_string(),
            source,
            steps: vec![
                StepView {
                    order: 1,
                    text: "Read the book".to_string(),
                },
                StepView {
                    order: 2,
                    text: "Write a CLI".to_string(),
                },
            ],
        }
    }

    fn summary(id: i64, selected: bool) -> GoalSummary {
        GoalSummary {
            id,
            goal_text: format!("Goal {}", id),
            score_label: "4.0/10".to_string(),
            created_on: "Mar 5, 2024".to_string(),
            step_count: 5,
            selected,
        }
    }

    #[test]
    fn test_detail_panel() {
        let output = render_detail(&detail(DetailSource::Created));
        let expected = "Goal Breakdown\nGoal: Learn Rust\nComplexity  ████████████░░░░░░░░ 6.0/10\nActionable Steps\n  1. Read the book\n  2. Write a CLI\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_selected_detail_is_closable() {
        let output = render_detail(&detail(DetailSource::Selected));
        assert!(output.starts_with("Goal Breakdown  (close to dismiss)\n"));
    }

    #[test]
    fn test_multiline_detail_text_keeps_its_column() {
        let mut view = detail(DetailSource::Created);
        view.goal_text = "Learn Rust\nthen ship a CLI".to_string();
        view.steps[1].text = "Write a CLI\r\nwith clap".to_string();

        let output = render_detail(&view);

        assert!(output.contains("Goal: Learn Rust\n      then ship a CLI\nComplexity"));
        assert!(output.contains("  2. Write a CLI\n     with clap\n"));
        let complexity_rows = output.lines().filter(|l| l.starts_with("Complexity"));
        assert_eq!(complexity_rows.count(), 1);
    }

    #[test]
    fn test_multiline_summary_keeps_its_column() {
        let mut entry = summary(8, false);
        entry.goal_text = "Learn Rust\nComplexity: 10".to_string();

        let output = render_summary(12, &entry);

        let expected = "  12. Learn Rust\n      Complexity: 10\n       4.0/10 complexity | Mar 5, 2024 | 5 steps | #8\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_score_bar_clamps() {
        assert_eq!(score_bar(15.0), "█".repeat(BAR_WIDTH));
        assert_eq!(score_bar(-1.0), "░".repeat(BAR_WIDTH));
        assert_eq!(score_bar(f64::NAN), "░".repeat(BAR_WIDTH));
    }

    #[test]
    fn test_goal_list_entries() {
        let list = GoalListView {
            headline: "2 goals broken down and ready to achieve".to_string(),
            loading: false,
            can_hide: true,
            body: GoalListBody::Goals(vec![summary(8, true), summary(3, false)]),
        };
        let output = render_goal_list(&list);
        let expected = "All Your Goals\n2 goals broken down and ready to achieve\n*  1. Goal 8\n       4.0/10 complexity | Mar 5, 2024 | 5 steps | #8\n   2. Goal 3\n       4.0/10 complexity | Mar 5, 2024 | 5 steps | #3\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_frame_shows_error_and_prompt() {
        let view = ViewModel {
            form: FormView {
                input: "Run a marathon".to_string(),
                submitting: true,
                can_submit: false,
            },
            error: Some("goal_text too short".to_string()),
            detail: None,
            goals: GoalListView {
                headline: "Your goal breakdowns will appear here".to_string(),
                loading: false,
                can_hide: false,
                body: GoalListBody::RefreshPrompt,
            },
        };
        let output = render(&view);
        assert!(output.contains("> Run a marathon\n  AI is breaking down your goal...\n"));
        assert!(output.contains("\n! goal_text too short\n"));
        assert!(output.contains("Type \"refresh\" to view all goals"));
        assert!(!output.contains("Goal Breakdown"));
    }
}
