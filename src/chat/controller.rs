//! Conversation controller
//!
//! Owns the transcript, the input field, and the chat state. Every mutation
//! goes through [`transition`] and the resulting effects are applied here.

use super::client::{ClientError, RelayClient};
use super::effect::Effect;
use super::event::Event;
use super::message::{Transcript, WELCOME_GREETING};
use super::state::ChatState;
use super::transition::{transition, TransitionError, TransitionResult};

/// Quick-suggestion prompts, submitted exactly as if typed
pub const SUGGESTIONS: [&str; 4] = [
    "Best places to visit in India",
    "European summer destinations",
    "Budget-friendly travel tips",
    "Adventure travel recommendations",
];

/// A dispatched relay call waiting to be settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    text: String,
    generation: u64,
}

impl PendingReply {
    /// Raw text to send to the relay
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Conversation controller
#[derive(Debug)]
pub struct ConversationController {
    state: ChatState,
    transcript: Transcript,
    /// Bumped on every clear
    generation: u64,
    input: String,
    scroll_pending: bool,
}

impl Default for ConversationController {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ChatState::Idle,
            transcript: Transcript::with_greeting(WELCOME_GREETING),
            generation: 0,
            input: String::new(),
            scroll_pending: true,
        }
    }

    // ============================================================
    // Accessors
    // ============================================================

    #[must_use]
    pub fn state(&self) -> ChatState {
        self.state
    }

    #[must_use]
    pub fn is_awaiting_reply(&self) -> bool {
        self.state.is_awaiting_reply()
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether the send action is available right now
    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.is_awaiting_reply() && !self.input.trim().is_empty()
    }

    /// Returns true once after each transcript change
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    // ============================================================
    // Input field
    // ============================================================

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    // ============================================================
    // Mutators
    // ============================================================

    /// Submit `text`, wait for the relay, and record the outcome
    ///
    /// # Errors
    ///
    /// Rejects the submission as [`begin_submit`](Self::begin_submit) does.
    /// Relay failures are not errors here; they land in the transcript.
    pub async fn submit<R>(&mut self, relay: &R, text: &str) -> Result<(), TransitionError>
    where
        R: RelayClient + ?Sized,
    {
        let pending = self.begin_submit(text)?;
        let outcome = relay.send(pending.text()).await;
        self.settle(pending, outcome)
    }

    /// First half of [`submit`](Self::submit): append the user message and
    /// enter `awaiting-reply`. The caller sends [`PendingReply::text`] to the
    /// relay and hands the outcome to [`settle`](Self::settle).
    ///
    /// # Errors
    ///
    /// [`TransitionError::EmptyMessage`] for blank text and
    /// [`TransitionError::Busy`] while a reply is outstanding. Neither
    /// touches the transcript.
    pub fn begin_submit(&mut self, text: &str) -> Result<PendingReply, TransitionError> {
        let result = transition(
            &self.state,
            self.generation,
            Event::Submit {
                text: text.to_string(),
            },
        )
        .inspect_err(|e| tracing::debug!(state = self.state.label(), error = %e, "Submit rejected"))?;

        self.apply(result).ok_or_else(|| {
            TransitionError::InvalidTransition("submit produced no relay dispatch".to_string())
        })
    }

    /// Submit the input field; it is emptied once the submission is accepted
    ///
    /// # Errors
    ///
    /// Same as [`begin_submit`](Self::begin_submit); the input is kept.
    pub fn submit_input(&mut self) -> Result<PendingReply, TransitionError> {
        let text = self.input.clone();
        let pending = self.begin_submit(&text)?;
        self.input.clear();
        Ok(pending)
    }

    /// Submit a quick suggestion; the input field is left alone
    ///
    /// # Errors
    ///
    /// [`TransitionError::UnknownSuggestion`] for an index past
    /// [`SUGGESTIONS`], otherwise as [`begin_submit`](Self::begin_submit).
    pub fn submit_suggestion(&mut self, index: usize) -> Result<PendingReply, TransitionError> {
        let text = SUGGESTIONS
            .get(index)
            .ok_or(TransitionError::UnknownSuggestion(index))?;
        self.begin_submit(text)
    }

    /// Second half of [`submit`](Self::submit). Always leaves the controller
    /// idle when `pending` is the call in flight.
    ///
    /// # Errors
    ///
    /// [`TransitionError::InvalidTransition`] when no reply is outstanding.
    #[allow(clippy::needless_pass_by_value)] // Consumed so a reply settles once
    pub fn settle(
        &mut self,
        pending: PendingReply,
        outcome: Result<String, ClientError>,
    ) -> Result<(), TransitionError> {
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, transport = e.is_transport(), "Relay call failed");
        }

        let result = transition(
            &self.state,
            self.generation,
            Event::ReplySettled {
                generation: pending.generation,
                outcome,
            },
        )?;
        self.apply(result);
        Ok(())
    }

    /// Replace the transcript with a fresh greeting; an outstanding call keeps
    /// running but its reply will be discarded
    pub fn clear(&mut self) {
        match transition(&self.state, self.generation, Event::Clear) {
            Ok(result) => {
                self.apply(result);
            }
            Err(e) => tracing::error!(error = %e, "Clear rejected"),
        }
    }

    /// Apply a transition; returns the relay dispatch, if any
    fn apply(&mut self, result: TransitionResult) -> Option<PendingReply> {
        let TransitionResult { new_state, effects } = result;
        if new_state != self.state {
            tracing::debug!(from = self.state.label(), to = new_state.label(), "Chat state change");
        }
        self.state = new_state;

        let mut dispatch = None;
        for effect in effects {
            match effect {
                Effect::AppendMessage { sender, text } => {
                    self.transcript.push(sender, text);
                }
                Effect::ResetTranscript { greeting } => {
                    self.transcript.reset(&greeting);
                    self.generation += 1;
                }
                Effect::DispatchRelay { text, generation } => {
                    dispatch = Some(PendingReply { text, generation });
                }
                Effect::DiscardStaleReply { generation } => {
                    tracing::info!(
                        generation,
                        current = self.generation,
                        "Discarding reply for a cleared transcript"
                    );
                }
                Effect::ScrollToLatest => self.scroll_pending = true,
            }
        }
        dispatch
    }
}
