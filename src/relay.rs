//! HTTP relay between chat clients and the upstream completion API
//!
//! Stateless: every request is validated, forwarded once, and answered.

mod handlers;
mod types;

pub use handlers::{create_router, RelayError};
pub use types::{ChatReply, ChatRequest, ErrorResponse, VersionResponse};

use crate::llm::LlmService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmService>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }
}
