//! HTTP client for the Goal Breaker API.
//!
//! Three calls make up the contract: create a goal, list goals, and fetch one
//! goal by id. Each call is a single attempt with no retries, timeouts or auth.

use std::future::Future;

use hyper::ext::ReasonPhrase;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{CreateGoalInput, Goal};

/// Fallback detail when a rejected create carries no usable `detail` field.
const CREATE_FAILED: &str = "Failed to create goal";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend could not be reached at all.
    #[error("Cannot connect to backend at {base_url}. Make sure the backend is running.")]
    Unreachable {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend rejected a create with a structured message.
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },

    /// The backend rejected a create without a readable body.
    #[error("Server returned {}: {}", .status.as_u16(), .reason)]
    Status { status: StatusCode, reason: String },

    /// A read call returned a non-success status.
    #[error("Failed to fetch {what}")]
    FetchFailed {
        what: &'static str,
        status: StatusCode,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The task running a request ended without a response, e.g. by panicking.
    #[error("Request failed: {0}")]
    Aborted(String),
}

/// The calls the view controller needs from a backend.
///
/// [`GoalClient`] talks to the real service; tests substitute their own.
pub trait GoalApi: Send + Sync + 'static {
    /// Base URL the backend is expected at, used in diagnostics.
    fn base_url(&self) -> &str;

    fn create_goal(
        &self,
        goal_text: &str,
    ) -> impl Future<Output = Result<Goal, ClientError>> + Send;

    fn get_goals(&self) -> impl Future<Output = Result<Vec<Goal>, ClientError>> + Send;

    fn get_goal(&self, id: i64) -> impl Future<Output = Result<Goal, ClientError>> + Send;
}

/// Body of the backend's root endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

/// HTTP client for the Goal Breaker API.
#[derive(Debug, Clone)]
pub struct GoalClient {
    base_url: String,
    client: Client,
}

impl GoalClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "sending request");
        self.client.request(method, &url)
    }

    /// Send a request, separating connection failures from other transport errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send().await.map_err(|e| {
            if e.is_connect() {
                tracing::warn!(base_url = %self.base_url, "backend unreachable");
                ClientError::Unreachable {
                    base_url: self.base_url.clone(),
                    source: e,
                }
            } else {
                ClientError::Http(e)
            }
        })
    }

    /// Decode a read response, mapping any non-success status to `FetchFailed`.
    async fn handle_fetch<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        what: &'static str,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            tracing::warn!(%status, what, "fetch failed");
            Err(ClientError::FetchFailed { what, status })
        }
    }

    /// Check the backend's root endpoint.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.send(self.request(Method::GET, "/")).await?;
        self.handle_fetch(response, "status").await
    }
}

impl GoalApi for GoalClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn create_goal(&self, goal_text: &str) -> Result<Goal, ClientError> {
        let input = CreateGoalInput {
            goal_text: goal_text.to_string(),
        };
        let response = self
            .send(self.request(Method::POST, "/api/goals").json(&input))
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let reason = reason_phrase(&response);
        let body = response.text().await.unwrap_or_default();
        let err = rejection(status, reason, &body);
        tracing::warn!(%status, error = %err, "create goal rejected");
        Err(err)
    }

    async fn get_goals(&self) -> Result<Vec<Goal>, ClientError> {
        let response = self.send(self.request(Method::GET, "/api/goals")).await?;
        self.handle_fetch(response, "goals").await
    }

    async fn get_goal(&self, id: i64) -> Result<Goal, ClientError> {
        let response = self
            .send(self.request(Method::GET, &format!("/api/goals/{}", id)))
            .await?;
        self.handle_fetch(response, "goal").await
    }
}

/// Reason phrase the server sent, falling back to the canonical one.
fn reason_phrase(response: &reqwest::Response) -> String {
    let sent = response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|r| std::str::from_utf8(r.as_bytes()).ok());
    let reason = sent.or(response.status().canonical_reason());
    reason.unwrap_or("Unknown Status").to_string()
}

/// Build the error for a non-success create response.
fn rejection(status: StatusCode, reason: String, body: &str) -> ClientError {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return ClientError::Status { status, reason };
    };

    let detail = match json.get("detail") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {
            CREATE_FAILED.to_string()
        }
        Some(other) => other.to_string(),
    };
    ClientError::Rejected { status, detail }
}
