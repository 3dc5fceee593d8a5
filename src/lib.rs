//! `TravelPal` chat relay
//!
//! A stateless HTTP relay that forwards travel questions to a hosted
//! completion API, and the conversation controller that drives the
//! terminal chat client.

pub mod chat;
pub mod config;
pub mod llm;
pub mod relay;
pub mod system_prompt;
pub mod tui;
