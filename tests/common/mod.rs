#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use goal_breaker::models::{CreateGoalInput, Goal, Task};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A canned response returned for the next create call instead of a goal.
#[derive(Debug, Clone)]
pub struct Failure {
    pub status: StatusCode,
    pub body: String,
}

/// In-memory stand-in for the Goal Breaker backend.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub goals: Vec<Goal>,
    pub create_failure: Option<Failure>,
    pub list_failure: Option<StatusCode>,
    pub requests: usize,
    pub next_id: i64,
}

pub type Shared = Arc<Mutex<FakeBackend>>;

impl FakeBackend {
    pub fn with_goals(goals: Vec<Goal>) -> Self {
        let next_id = goals.iter().map(|g| g.id).max().unwrap_or(0);
        Self {
            goals,
            next_id,
            ..Self::default()
        }
    }

    /// Build a goal whose tasks arrive out of order (3, 1, 2).
    fn break_down(&mut self, goal_text: String) -> Goal {
        self.next_id += 1;
        let id = self.next_id;
        Goal {
            id,
            goal_text,
            complexity_score: 4.5,
            created_at: format!("2030-01-01T00:00:{:02}", id),
            tasks: [3, 1, 2]
                .into_iter()
                .map(|order| Task {
                    id: id * 10 + order,
                    task_text: format!("Step {}", order),
                    order,
                })
                .collect(),
        }
    }
}

pub fn goal(id: i64, goal_text: &str, created_at: &str) -> Goal {
    Goal {
        id,
        goal_text: goal_text.to_string(),
        complexity_score: 5.0,
        created_at: created_at.to_string(),
        tasks: vec![Task {
            id: id * 10,
            task_text: format!("Start on {}", goal_text),
            order: 1,
        }],
    }
}

async fn health(State(state): State<Shared>) -> Json<serde_json::Value> {
    state.lock().unwrap().requests += 1;
    Json(json!({ "message": "Goal Breaker API is running" }))
}

async fn create_goal(State(state): State<Shared>, Json(input): Json<CreateGoalInput>) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests += 1;
    if let Some(failure) = backend.create_failure.clone() {
        return (failure.status, failure.body).into_response();
    }
    let goal = backend.break_down(input.goal_text);
    backend.goals.push(goal.clone());
    Json(goal).into_response()
}

async fn list_goals(State(state): State<Shared>) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests += 1;
    if let Some(status) = backend.list_failure {
        return status.into_response();
    }
    Json(backend.goals.clone()).into_response()
}

async fn get_goal(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests += 1;
    let Some(goal) = backend.goals.iter().find(|g| g.id == id) else {
        let body = Json(json!({ "detail": "Goal not found" }));
        return (StatusCode::NOT_FOUND, body).into_response();
    };
    Json(goal.clone()).into_response()
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/goals", get(list_goals).post(create_goal))
        .route("/api/goals/{id}", get(get_goal))
        .with_state(state)
}

/// Serve a fake backend on an ephemeral port, returning its base URL.
pub async fn spawn(backend: FakeBackend) -> (String, Shared) {
    let state = Arc::new(Mutex::new(backend));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().expect("Failed to read local address");
    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Fake backend crashed");
    });
    (format!("http://{}", addr), state)
}

/// Answer the first connection with a hand-written status line such as
/// `503 Backend Warming Up`, returning the base URL.
pub async fn spawn_raw(status_line: &str, body: &str) -> String {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind raw backend");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("Failed to accept");
        read_request(&mut socket)
            .await
            .expect("Failed to read request");
        socket
            .write_all(response.as_bytes())
            .await
            .expect("Failed to write response");
        let _ = socket.shutdown().await;
    });
    format!("http://{}", addr)
}

/// Consume one request, headers and body, so closing the socket is clean.
async fn read_request(socket: &mut TcpStream) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&request);
        if let Some(end) = text.find("\r\n\r\n") {
            if request.len() >= end + 4 + content_length(&text[..end]) {
                return Ok(());
            }
        }
    }
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// A base URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{}", addr)
}
