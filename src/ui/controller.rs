//! Drives a [`ViewState`] against a [`GoalApi`].
//!
//! User actions are applied synchronously through [`Controller::dispatch`].
//! Actions that need the network spawn a task; its results come back as
//! [`Completion`]s on a channel and are applied, in arrival order, by
//! [`Controller::apply`]. Only the owner of the controller mutates state.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::client::{ClientError, GoalApi};
use crate::models::Goal;

use super::state::ViewState;
use super::view::{derive, ViewModel};

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Initial best-effort prefetch of the goal list.
    Mount,
    SetInput(String),
    Submit,
    Refresh,
    Select(i64),
    CloseDetail,
    HideGoals,
}

/// The result of a network call started by an action.
#[derive(Debug)]
pub enum Completion {
    Mounted(Result<Vec<Goal>, ClientError>),
    Created(Result<Goal, ClientError>),
    /// List fetched after a successful create.
    SubmitListed(Result<Vec<Goal>, ClientError>),
    Refreshed(Result<Vec<Goal>, ClientError>),
}

pub struct Controller<A: GoalApi> {
    api: Arc<A>,
    state: ViewState,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<A: GoalApi> Controller<A> {
    pub fn new(api: A) -> Self {
        let state = ViewState::new(api.base_url());
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api: Arc::new(api),
            state,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> ViewModel {
        derive(&self.state)
    }

    /// Number of spawned requests whose final completion has not been applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn take_scroll_request(&mut self) -> bool {
        self.state.take_scroll_request()
    }

    /// Apply an action. Returns false if it was ignored (blank input, a
    /// disabled control, or an unknown goal).
    pub fn dispatch(&mut self, action: Action) -> bool {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::Mount => {
                self.state.begin_mount();
                self.spawn_list(Completion::Mounted);
                true
            }
            Action::SetInput(text) => {
                self.state.set_input(text);
                true
            }
            Action::Submit => match self.state.begin_submit() {
                Some(text) => {
                    self.spawn_submit(text);
                    true
                }
                None => false,
            },
            Action::Refresh => {
                if !self.state.begin_refresh() {
                    return false;
                }
                self.spawn_list(Completion::Refreshed);
                true
            }
            Action::Select(id) => self.state.select_goal(id),
            Action::CloseDetail => {
                self.state.close_detail();
                true
            }
            Action::HideGoals => {
                self.state.hide_goals();
                true
            }
        }
    }

    /// Wait for the next completion. Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        self.rx.recv().await
    }

    /// Apply a completion to the state.
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Mounted(result) => {
                self.finish_request();
                self.state.mount_finished(result);
            }
            Completion::Created(Ok(goal)) => {
                tracing::debug!(goal_id = goal.id, tasks = goal.tasks.len(), "goal created");
                self.state.goal_created(goal);
            }
            Completion::Created(Err(e)) => {
                self.finish_request();
                self.state.submit_failed(&e);
                self.state.end_submit();
            }
            Completion::SubmitListed(result) => {
                self.finish_request();
                match result {
                    Ok(goals) => self.state.submit_list_loaded(goals),
                    Err(e) => self.state.submit_failed(&e),
                }
                self.state.end_submit();
            }
            Completion::Refreshed(result) => {
                self.finish_request();
                self.state.refresh_finished(result);
            }
        }
    }

    /// Apply completions until no request is in flight.
    pub async fn settle(&mut self) {
        while let Some(completion) = self.next_completion().await {
            self.apply(completion);
        }
    }

    /// Dispatch an action and wait for all resulting requests to finish.
    pub async fn run(&mut self, action: Action) -> bool {
        let accepted = self.dispatch(action);
        self.settle().await;
        accepted
    }

    fn finish_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn spawn_list(&mut self, wrap: fn(Result<Vec<Goal>, ClientError>) -> Completion) {
        self.in_flight += 1;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = supervised(async move { api.get_goals().await }).await;
            let _ = tx.send(wrap(result));
        });
    }

    fn spawn_submit(&mut self, text: String) {
        self.in_flight += 1;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let create = {
                let api = Arc::clone(&api);
                async move { api.create_goal(&text).await }
            };
            let created = supervised(create).await;
            let succeeded = created.is_ok();
            if tx.send(Completion::Created(created)).is_err() || !succeeded {
                return;
            }
            let listed = supervised(async move { api.get_goals().await }).await;
            let _ = tx.send(Completion::SubmitListed(listed));
        });
    }
}

/// Run a request on its own task. A panic inside it becomes
/// [`ClientError::Aborted`], so every spawned request still reports back.
async fn supervised<T, F>(request: F) -> Result<T, ClientError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, ClientError>> + Send + 'static,
{
    match tokio::spawn(request).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "request task failed");
            Err(ClientError::Aborted(e.to_string()))
        }
    }
}
