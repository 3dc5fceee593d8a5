//! System directive and sampling parameters for travel planning replies

use crate::llm::LlmRequest;

/// Persona sent ahead of every user message
pub const SYSTEM_PROMPT: &str = "You are an expert travel planner AI.";

/// Upper bound on generated reply length
pub const MAX_REPLY_TOKENS: u32 = 200;

/// Moderate randomness: varied suggestions, still on topic
pub const TEMPERATURE: f32 = 0.7;

/// Build the two-turn prompt (system directive, then the user's message)
#[must_use]
pub fn build_request(user_message: &str) -> LlmRequest {
    LlmRequest::single_turn(Some(SYSTEM_PROMPT), user_message)
        .with_max_tokens(MAX_REPLY_TOKENS)
        .with_temperature(TEMPERATURE)
}
