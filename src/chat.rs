//! Conversation controller
//!
//! Implements the Elm Architecture pattern: a pure transition function over
//! a two-state machine (`idle`, `awaiting-reply`), with effects applied by
//! [`ConversationController`] to an append-only transcript.

mod client;
mod controller;
mod effect;
mod event;
mod message;
mod state;
mod transition;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub mod testing;

pub use client::{ClientError, HttpRelayClient, RelayClient};
pub use controller::{ConversationController, PendingReply, SUGGESTIONS};
pub use effect::Effect;
pub use event::Event;
pub use message::{Message, MessageId, Sender, Transcript, CLEARED_GREETING, WELCOME_GREETING};
pub use state::ChatState;
pub use transition::{
    transition, TransitionError, TransitionResult, EMPTY_REPLY_FALLBACK, ERROR_MARKER,
};
