//! Backend API client
//!
//! Thin JSON-over-HTTP client for the education backend. Four endpoints:
//! `/parse`, `/hints`, `/quiz`, and `/studybuddy`. Requests carry no
//! read timeout — the client waits for a response or a connection-level
//! failure, and the caller gates re-submission.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

pub mod types;

use crate::errors::ApiError;
use types::{AnswerPayload, ErrorBody, HintsResponse, Quiz};

/// Trait abstraction over the education backend, enabling test mocking.
#[async_trait]
pub trait StudyBackend: Send + Sync {
    /// Submit a problem for parsing; the result is opaque JSON.
    async fn parse_problem(&self, text: &str) -> Result<Value, ApiError>;

    /// Fetch solution hints for a problem.
    async fn hints(&self, text: &str) -> Result<Vec<String>, ApiError>;

    /// Generate a multiple-choice quiz for a topic.
    async fn quiz(&self, text: &str) -> Result<Quiz, ApiError>;

    /// Ask the study buddy a free-form question.
    async fn ask(&self, question: &str) -> Result<AnswerPayload, ApiError>;
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the given backend endpoint. No request timeout is
    /// set: a slow answer is preferable to a spurious abort, and the session
    /// blocks further submissions while one is outstanding.
    pub fn new(endpoint: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Connect(e.to_string()))?;
        Ok(Self {
            client,
            base_url: endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Connect(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Connect(e.to_string()))?;

        if !status.is_success() {
            // The backend reports application-level failures as an object
            // with an `error` field; anything else is a raw HTTP failure.
            if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
                warn!("backend error on {}: {}", path, body.error);
                return Err(ApiError::Backend(body.error));
            }
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                message: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl StudyBackend for ApiClient {
    async fn parse_problem(&self, text: &str) -> Result<Value, ApiError> {
        self.post("/parse", serde_json::json!({ "text": text })).await
    }

    async fn hints(&self, text: &str) -> Result<Vec<String>, ApiError> {
        let response: HintsResponse = self
            .post("/hints", serde_json::json!({ "text": text }))
            .await?;
        Ok(response.hints)
    }

    async fn quiz(&self, text: &str) -> Result<Quiz, ApiError> {
        self.post("/quiz", serde_json::json!({ "text": text })).await
    }

    async fn ask(&self, question: &str) -> Result<AnswerPayload, ApiError> {
        self.post("/studybuddy", serde_json::json!({ "question": question }))
            .await
    }
}

/// Mock backend for unit testing.
///
/// Queue-based: each call to `ask()` pops the next pre-configured result.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockBackend {
        answers: Mutex<VecDeque<Result<AnswerPayload, ApiError>>>,
    }

    impl MockBackend {
        pub fn with_answers(answers: Vec<Result<AnswerPayload, ApiError>>) -> Self {
            Self {
                answers: Mutex::new(VecDeque::from(answers)),
            }
        }
    }

    #[async_trait]
    impl StudyBackend for MockBackend {
        async fn parse_problem(&self, text: &str) -> Result<Value, ApiError> {
            Ok(serde_json::json!({ "parsed": format!("Problem received: {}", text) }))
        }

        async fn hints(&self, _text: &str) -> Result<Vec<String>, ApiError> {
            Ok(vec!["hint one".to_string(), "hint two".to_string()])
        }

        async fn quiz(&self, text: &str) -> Result<Quiz, ApiError> {
            Ok(Quiz {
                question: format!("Quiz on: {}", text),
                options: vec!["3".to_string(), "4".to_string()],
                correct: "4".to_string(),
            })
        }

        async fn ask(&self, _question: &str) -> Result<AnswerPayload, ApiError> {
            let mut queue = self
                .answers
                .lock()
                .map_err(|e| ApiError::Backend(format!("mock lock poisoned: {}", e)))?;
            queue
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Backend("mock queue exhausted".to_string())))
        }
    }
}
