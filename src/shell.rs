//! Interactive terminal front end.
//!
//! A single event loop reads commands from the input and applies network
//! completions as they arrive, redrawing after every transition. Requests run
//! in the background, so the list can be browsed while a submit is pending.

use std::io::{self, Write};
use std::str::FromStr;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::client::GoalApi;
use crate::ui::{render, Action, Controller};

/// Clears the terminal and moves the cursor home, so the detail panel is in view.
const SCROLL_TO_TOP: &str = "\x1b[2J\x1b[H";

pub const HELP: &str = "\
Commands:
  goal <text>     break down a new goal
  input <text>    set the goal text without submitting
  submit          submit the current goal text
  refresh         reload all goals
  select <n>      show the n-th goal in the list (or select #<id>)
  close           dismiss the selected goal
  hide            hide the goal list
  help            show this help
  quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// 1-based position in the displayed list.
    Position(usize),
    Id(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Goal(String),
    Input(String),
    Submit,
    Refresh,
    Select(Selector),
    Close,
    Hide,
    Help,
    Quit,
    /// Blank line.
    Redraw,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Unknown command \"{0}\". Type \"help\" for a list of commands.")]
    Unknown(String),
    #[error("\"{0}\" needs an argument. Type \"help\" for usage.")]
    MissingArgument(&'static str),
    #[error("Invalid goal reference \"{0}\". Use a list position like 2 or an id like #17.")]
    InvalidSelector(String),
}

impl FromStr for Selector {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCommandError::InvalidSelector(s.to_string());
        match s.strip_prefix('#') {
            Some(id) => id.parse().map(Self::Id).map_err(|_| invalid()),
            None => match s.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Self::Position(n)),
                _ => Err(invalid()),
            },
        }
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Redraw),
            "goal" if rest.is_empty() => Err(ParseCommandError::MissingArgument("goal")),
            "goal" => Ok(Self::Goal(rest.to_string())),
            "input" => Ok(Self::Input(rest.to_string())),
            "submit" => Ok(Self::Submit),
            "refresh" => Ok(Self::Refresh),
            "select" if rest.is_empty() => Err(ParseCommandError::MissingArgument("select")),
            "select" => rest.parse().map(Self::Select),
            "close" => Ok(Self::Close),
            "hide" => Ok(Self::Hide),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(ParseCommandError::Unknown(word.to_string())),
        }
    }
}

enum Flow {
    Continue(Option<String>),
    Quit,
}

/// Run the interactive loop until `quit`, or until input ends and every
/// outstanding request has been applied.
pub async fn run<A, R, W>(controller: &mut Controller<A>, input: R, out: &mut W) -> io::Result<()>
where
    A: GoalApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    controller.dispatch(Action::Mount);
    draw(controller, out, None)?;

    let mut lines = input.lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) => match handle_line(controller, &line) {
                        Flow::Quit => break,
                        Flow::Continue(notice) => draw(controller, out, notice.as_deref())?,
                    },
                    None => {
                        tracing::debug!(in_flight = controller.in_flight(), "input closed");
                        input_open = false;
                        if controller.in_flight() == 0 {
                            break;
                        }
                    }
                }
            }
            Some(completion) = controller.next_completion() => {
                controller.apply(completion);
                draw(controller, out, None)?;
                if !input_open && controller.in_flight() == 0 {
                    break;
                }
            }
            else => break,
        }
    }

    out.flush()
}

fn handle_line<A: GoalApi>(controller: &mut Controller<A>, line: &str) -> Flow {
    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(e) => return Flow::Continue(Some(e.to_string())),
    };

    let notice = match command {
        Command::Goal(text) => {
            controller.dispatch(Action::SetInput(text));
            submit(controller)
        }
        Command::Input(text) => {
            controller.dispatch(Action::SetInput(text));
            None
        }
        Command::Submit => submit(controller),
        Command::Refresh => (!controller.dispatch(Action::Refresh))
            .then(|| "Goals are already loading.".to_string()),
        Command::Select(selector) => select(controller, selector),
        Command::Close => {
            controller.dispatch(Action::CloseDetail);
            None
        }
        Command::Hide => {
            controller.dispatch(Action::HideGoals);
            None
        }
        Command::Help => Some(HELP.to_string()),
        Command::Quit => return Flow::Quit,
        Command::Redraw => None,
    };
    Flow::Continue(notice)
}

fn submit<A: GoalApi>(controller: &mut Controller<A>) -> Option<String> {
    if controller.dispatch(Action::Submit) {
        return None;
    }
    if controller.state().submitting {
        Some("A goal is already being broken down.".to_string())
    } else {
        Some("Enter a goal first.".to_string())
    }
}

fn select<A: GoalApi>(controller: &mut Controller<A>, selector: Selector) -> Option<String> {
    if !controller.state().show_goals {
        return Some("The goal list is hidden. Type \"refresh\" to show it.".to_string());
    }
    let id = match selector {
        Selector::Id(id) => id,
        Selector::Position(n) => match controller.state().goals.get(n - 1) {
            Some(goal) => goal.id,
            None => return Some(format!("There is no goal at position {}.", n)),
        },
    };
    (!controller.dispatch(Action::Select(id))).then(|| format!("No goal #{} in the list.", id))
}

fn draw<A: GoalApi, W: Write>(
    controller: &mut Controller<A>,
    out: &mut W,
    notice: Option<&str>,
) -> io::Result<()> {
    if controller.take_scroll_request() {
        out.write_all(SCROLL_TO_TOP.as_bytes())?;
    }
    out.write_all(render(&controller.view()).as_bytes())?;
    if let Some(notice) = notice {
        writeln!(out, "\n{}", notice)?;
    }
    out.flush()
}
