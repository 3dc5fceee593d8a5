//! Mock relay client for tests

#![allow(clippy::missing_panics_doc, clippy::must_use_candidate)]

use super::client::{ClientError, RelayClient};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock relay that returns queued outcomes and records what was sent
#[derive(Default)]
pub struct MockRelayClient {
    outcomes: Mutex<VecDeque<Result<String, ClientError>>>,
    sent: Mutex<Vec<String>>,
}

impl MockRelayClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.outcomes.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn queue_error(&self, error: ClientError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    /// Messages sent so far, in order
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelayClient for MockRelayClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        self.sent.lock().unwrap().push(message.to_string());
        self.outcomes.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ClientError::Transport {
                base_url: "mock://relay".to_string(),
                detail: "No mock outcome queued".to_string(),
            })
        })
    }
}
