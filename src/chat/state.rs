//! Conversation state types

/// Conversation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    /// Ready for input, no relay call outstanding
    #[default]
    Idle,

    /// A relay call is in flight
    AwaitingReply {
        /// Transcript generation the call was dispatched in
        generation: u64,
    },
}

impl ChatState {
    #[must_use]
    pub fn is_awaiting_reply(self) -> bool {
        matches!(self, ChatState::AwaitingReply { .. })
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ChatState::Idle => "idle",
            ChatState::AwaitingReply { .. } => "awaiting-reply",
        }
    }
}
