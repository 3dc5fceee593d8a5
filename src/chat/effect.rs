//! Effects produced by state transitions

use super::message::Sender;

/// Effects to be applied by the controller after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage { sender: Sender, text: String },

    /// Replace the transcript with a single bot greeting
    ResetTranscript { greeting: String },

    /// Send `text` to the relay
    DispatchRelay { text: String, generation: u64 },

    /// A reply arrived for a transcript that has since been cleared
    DiscardStaleReply { generation: u64 },

    /// Bring the newest message into view
    ScrollToLatest,
}

impl Effect {
    #[must_use]
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn append_bot(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}
