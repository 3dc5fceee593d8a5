//! Property-based tests for the conversation controller
//!
//! These tests verify key invariants hold across arbitrary inputs:
//! - Successful round trips grow the transcript by exactly two entries
//! - Earlier entries are never modified
//! - Settling always returns to idle
//! - Blank input never dispatches
//! - At most one relay call is outstanding

use super::client::ClientError;
use super::controller::{ConversationController, PendingReply, SUGGESTIONS};
use super::message::{MessageId, Sender};
use super::state::ChatState;
use super::transition::TransitionError;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ?!.,]{0,8}[a-zA-Z0-9?!.,][a-zA-Z0-9 ?!.,]{0,30}"
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,10}"
}

fn arb_client_error() -> impl Strategy<Value = ClientError> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(|detail| ClientError::Transport {
            base_url: "http://localhost:5000".to_string(),
            detail,
        }),
        (400u16..600, "[a-zA-Z ]{1,20}")
            .prop_map(|(status, detail)| ClientError::Status { status, detail }),
        "[a-z ]{1,20}".prop_map(ClientError::Decode),
        "[a-z ]{1,20}".prop_map(ClientError::Network),
    ]
}

fn arb_outcome() -> impl Strategy<Value = Result<String, ClientError>> {
    prop_oneof![
        arb_text().prop_map(Ok),
        Just(Ok(String::new())),
        arb_client_error().prop_map(Err),
    ]
}

#[derive(Debug, Clone)]
enum Action {
    Type(String),
    Suggest(usize),
    Settle(Result<String, ClientError>),
    Clear,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => prop_oneof![arb_text(), arb_blank()].prop_map(Action::Type),
        1 => (0..SUGGESTIONS.len() + 1).prop_map(Action::Suggest),
        3 => arb_outcome().prop_map(Action::Settle),
        1 => Just(Action::Clear),
    ]
}

fn snapshot(chat: &ConversationController) -> Vec<(MessageId, String, Sender)> {
    chat.transcript()
        .iter()
        .map(|m| (m.id, m.text.clone(), m.sender))
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_round_trips_append_two_entries(
        turns in proptest::collection::vec((arb_text(), arb_text()), 1..12)
    ) {
        let mut chat = ConversationController::new();
        let initial = chat.transcript().len();

        for (i, (question, answer)) in turns.iter().enumerate() {
            let before = snapshot(&chat);

            let pending = chat.begin_submit(question).unwrap();
            chat.settle(pending, Ok(answer.clone())).unwrap();

            let after = snapshot(&chat);
            prop_assert_eq!(after.len(), initial + 2 * (i + 1));
            prop_assert_eq!(&after[..before.len()], before.as_slice());
            prop_assert_eq!(&after[before.len()].1, question);
            prop_assert_eq!(after[before.len()].2, Sender::User);
            prop_assert_eq!(&after[before.len() + 1].1, answer);
            prop_assert_eq!(after[before.len() + 1].2, Sender::Bot);
        }
    }

    #[test]
    fn prop_settle_always_returns_to_idle(
        question in arb_text(),
        outcome in arb_outcome(),
    ) {
        let mut chat = ConversationController::new();
        let pending = chat.begin_submit(&question).unwrap();
        prop_assert!(chat.is_awaiting_reply());

        let was_error = outcome.is_err();
        chat.settle(pending, outcome).unwrap();

        prop_assert_eq!(chat.state(), ChatState::Idle);
        let last = chat.transcript().last().unwrap();
        prop_assert_eq!(last.sender, Sender::Bot);
        prop_assert!(!last.text.is_empty());
        prop_assert_eq!(was_error, last.text.starts_with("⚠️"));
    }

    #[test]
    fn prop_blank_input_never_dispatches(blank in arb_blank()) {
        let mut chat = ConversationController::new();
        let before = snapshot(&chat);

        prop_assert_eq!(chat.begin_submit(&blank), Err(TransitionError::EmptyMessage));
        prop_assert_eq!(snapshot(&chat), before);
        prop_assert_eq!(chat.state(), ChatState::Idle);
    }

    #[test]
    fn prop_at_most_one_call_in_flight(
        actions in proptest::collection::vec(arb_action(), 1..40)
    ) {
        let mut chat = ConversationController::new();
        let mut in_flight: Option<PendingReply> = None;

        for action in actions {
            match action {
                Action::Type(text) => {
                    chat.set_input(text.clone());
                    let result = chat.submit_input();
                    let busy = in_flight.is_some();
                    match (busy, text.trim().is_empty()) {
                        (_, true) => prop_assert_eq!(result, Err(TransitionError::EmptyMessage)),
                        (true, false) => prop_assert_eq!(result, Err(TransitionError::Busy)),
                        (false, false) => {
                            let pending = result.unwrap();
                            prop_assert_eq!(pending.text(), text.as_str());
                            prop_assert_eq!(chat.input(), "");
                            in_flight = Some(pending);
                        }
                    }
                }
                Action::Suggest(index) => {
                    let result = chat.submit_suggestion(index);
                    if index >= SUGGESTIONS.len() {
                        prop_assert_eq!(result, Err(TransitionError::UnknownSuggestion(index)));
                    } else if in_flight.is_some() {
                        prop_assert_eq!(result, Err(TransitionError::Busy));
                    } else {
                        in_flight = Some(result.unwrap());
                    }
                }
                Action::Settle(outcome) => {
                    if let Some(pending) = in_flight.take() {
                        chat.settle(pending, outcome).unwrap();
                    }
                }
                Action::Clear => {
                    chat.clear();
                    prop_assert_eq!(chat.transcript().len(), 1);
                    prop_assert_eq!(chat.transcript().messages()[0].sender, Sender::Bot);
                }
            }

            prop_assert_eq!(chat.is_awaiting_reply(), in_flight.is_some());
        }
    }
}
