//! Events that drive the conversation state machine

use super::client::ClientError;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// Text entered, Enter pressed, or a suggestion chip picked
    Submit { text: String },

    /// The relay call dispatched in `generation` finished
    ReplySettled {
        generation: u64,
        outcome: Result<String, ClientError>,
    },

    /// Replace the transcript with a fresh greeting
    Clear,
}
