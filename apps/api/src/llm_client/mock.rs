//! Scripted `CompletionClient` for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionClient, CompletionPayload, CompletionRequest, LlmError};

pub struct MockCompletionClient {
    outcome: Outcome,
    requests: Mutex<Vec<CompletionRequest>>,
}

enum Outcome {
    Reply(CompletionPayload),
    Fail { status: u16, message: String },
}

impl MockCompletionClient {
    pub fn replying(payload: impl Into<CompletionPayload>) -> Self {
        Self {
            outcome: Outcome::Reply(payload.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            outcome: Outcome::Fail {
                status,
                message: message.to_string(),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionPayload, LlmError> {
        self.requests.lock().unwrap().push(request);
        match &self.outcome {
            Outcome::Reply(payload) => Ok(payload.clone()),
            Outcome::Fail { status, message } => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}
