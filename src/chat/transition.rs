//! Pure state transition function
//!
//! Given the same state, transcript generation, and event, `transition`
//! always yields the same new state and effects. It performs no I/O.

use super::effect::Effect;
use super::event::Event;
use super::message::CLEARED_GREETING;
use super::state::ChatState;
use thiserror::Error;

/// Marker prefixed to failure messages shown in the transcript
pub const ERROR_MARKER: &str = "⚠️";

/// Shown when the relay answers with an empty reply
pub const EMPTY_REPLY_FALLBACK: &str = "I couldn't understand that.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Still waiting for the previous reply")]
    Busy,
    #[error("No suggestion at index {0}")]
    UnknownSuggestion(usize),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// # Errors
///
/// Returns the [`TransitionError`] that rejects `event` in `state`; the
/// caller's state is left as it was.
pub fn transition(
    state: &ChatState,
    generation: u64,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (*state, event) {
        // ============================================================
        // Submission
        // ============================================================
        (_, Event::Submit { text }) if text.trim().is_empty() => Err(TransitionError::EmptyMessage),

        // One relay call at a time, whichever entry point submitted
        (ChatState::AwaitingReply { .. }, Event::Submit { .. }) => Err(TransitionError::Busy),

        (ChatState::Idle, Event::Submit { text }) => {
            Ok(TransitionResult::new(ChatState::AwaitingReply { generation })
                .with_effect(Effect::append_user(text.clone()))
                .with_effect(Effect::ScrollToLatest)
                .with_effect(Effect::DispatchRelay { text, generation }))
        }

        // ============================================================
        // Settling: always back to Idle
        // ============================================================
        (
            ChatState::AwaitingReply {
                generation: dispatched,
            },
            Event::ReplySettled {
                generation: settled,
                outcome,
            },
        ) if dispatched == settled => {
            let result = TransitionResult::new(ChatState::Idle);

            if settled != generation {
                return Ok(result.with_effect(Effect::DiscardStaleReply {
                    generation: settled,
                }));
            }

            let text = match outcome {
                Ok(reply) if reply.trim().is_empty() => EMPTY_REPLY_FALLBACK.to_string(),
                Ok(reply) => reply,
                Err(e) => format!("{ERROR_MARKER} Error: {e}"),
            };

            Ok(result
                .with_effect(Effect::append_bot(text))
                .with_effect(Effect::ScrollToLatest))
        }

        // ============================================================
        // Clear: any state, pending call left running
        // ============================================================
        (state, Event::Clear) => Ok(TransitionResult::new(state)
            .with_effect(Effect::ResetTranscript {
                greeting: CLEARED_GREETING.to_string(),
            })
            .with_effect(Effect::ScrollToLatest)),

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {} with event {event:?}",
            state.label()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::client::ClientError;
    use crate::chat::message::Sender;

    fn submit(text: &str) -> Event {
        Event::Submit {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_idle_to_awaiting_reply() {
        let result = transition(&ChatState::Idle, 0, submit("Best places to visit in India")).unwrap();

        assert_eq!(result.new_state, ChatState::AwaitingReply { generation: 0 });
        assert_eq!(
            result.effects,
            vec![
                Effect::append_user("Best places to visit in India"),
                Effect::ScrollToLatest,
                Effect::DispatchRelay {
                    text: "Best places to visit in India".to_string(),
                    generation: 0,
                },
            ]
        );
    }

    #[test]
    fn test_submit_keeps_raw_text() {
        let result = transition(&ChatState::Idle, 0, submit("  Lisbon?  ")).unwrap();
        assert_eq!(result.effects[0], Effect::append_user("  Lisbon?  "));
    }

    #[test]
    fn test_blank_submit_rejected() {
        for text in ["", " ", "\n\t  "] {
            let err = transition(&ChatState::Idle, 0, submit(text)).unwrap_err();
            assert_eq!(err, TransitionError::EmptyMessage);
        }
    }

    #[test]
    fn test_reject_submit_while_awaiting() {
        let err = transition(&ChatState::AwaitingReply { generation: 0 }, 0, submit("again"))
            .unwrap_err();
        assert_eq!(err, TransitionError::Busy);
    }

    #[test]
    fn test_success_appends_reply() {
        let result = transition(
            &ChatState::AwaitingReply { generation: 2 },
            2,
            Event::ReplySettled {
                generation: 2,
                outcome: Ok("Goa and Kerala".to_string()),
            },
        )
        .unwrap();

        assert_eq!(result.new_state, ChatState::Idle);
        assert_eq!(
            result.effects,
            vec![Effect::append_bot("Goa and Kerala"), Effect::ScrollToLatest]
        );
    }

    #[test]
    fn test_empty_reply_uses_fallback() {
        let result = transition(
            &ChatState::AwaitingReply { generation: 0 },
            0,
            Event::ReplySettled {
                generation: 0,
                outcome: Ok(String::new()),
            },
        )
        .unwrap();

        assert_eq!(result.effects[0], Effect::append_bot(EMPTY_REPLY_FALLBACK));
    }

    #[test]
    fn test_failure_appends_marked_error() {
        let result = transition(
            &ChatState::AwaitingReply { generation: 0 },
            0,
            Event::ReplySettled {
                generation: 0,
                outcome: Err(ClientError::Status {
                    status: 500,
                    detail: "Request timeout: deadline elapsed".to_string(),
                }),
            },
        )
        .unwrap();

        assert_eq!(result.new_state, ChatState::Idle);
        match &result.effects[0] {
            Effect::AppendMessage { sender, text } => {
                assert_eq!(*sender, Sender::Bot);
                assert!(text.starts_with(ERROR_MARKER));
                assert!(text.contains("Request timeout: deadline elapsed"));
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_stale_reply_discarded_but_state_cleared() {
        let result = transition(
            &ChatState::AwaitingReply { generation: 0 },
            1,
            Event::ReplySettled {
                generation: 0,
                outcome: Ok("late".to_string()),
            },
        )
        .unwrap();

        assert_eq!(result.new_state, ChatState::Idle);
        assert_eq!(
            result.effects,
            vec![Effect::DiscardStaleReply { generation: 0 }]
        );
    }

    #[test]
    fn test_settle_without_pending_call_is_invalid() {
        let err = transition(
            &ChatState::Idle,
            0,
            Event::ReplySettled {
                generation: 0,
                outcome: Ok("orphan".to_string()),
            },
        )
        .unwrap_err();

        assert!(matches!(err, TransitionError::InvalidTransition(_)));
    }

    #[test]
    fn test_clear_keeps_state() {
        for state in [ChatState::Idle, ChatState::AwaitingReply { generation: 4 }] {
            let result = transition(&state, 4, Event::Clear).unwrap();
            assert_eq!(result.new_state, state);
            assert_eq!(
                result.effects[0],
                Effect::ResetTranscript {
                    greeting: CLEARED_GREETING.to_string()
                }
            );
        }
    }
}
