//! Transcript entries and the append-only transcript

use chrono::{DateTime, Local};
use std::fmt;

/// Greeting shown when a session starts
pub const WELCOME_GREETING: &str = "Hello! I'm your AI travel assistant. Tell me your travel month, budget, and vibe — and I'll craft the perfect plan.";

/// Greeting that replaces the transcript on clear
pub const CLEARED_GREETING: &str = "Chat cleared. Ask me anything!";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

/// Session-unique message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

impl Message {
    /// Creation time as shown next to the message (`HH:MM`)
    #[must_use]
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Ordered, append-only sequence of messages
///
/// Entries are never edited or removed; [`Transcript::reset`] swaps the whole
/// sequence for a single bot greeting. Ids keep counting across resets.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    #[must_use]
    pub fn with_greeting(greeting: &str) -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        transcript.push(Sender::Bot, greeting);
        transcript
    }

    pub(crate) fn push(&mut self, sender: Sender, text: impl Into<String>) -> &Message {
        let text = text.into();
        debug_assert!(!text.is_empty(), "transcript entries are never empty");

        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text,
            sender,
            timestamp: Local::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    pub(crate) fn reset(&mut self, greeting: &str) {
        self.messages.clear();
        self.push(Sender::Bot, greeting);
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_bot_greeting() {
        let transcript = Transcript::with_greeting(WELCOME_GREETING);
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].sender, Sender::Bot);
        assert_eq!(transcript.messages()[0].text, WELCOME_GREETING);
    }

    #[test]
    fn test_ids_increase_and_survive_reset() {
        let mut transcript = Transcript::with_greeting(WELCOME_GREETING);
        let first = transcript.messages()[0].id;
        let second = transcript.push(Sender::User, "hi").id;
        assert!(second > first);

        transcript.reset(CLEARED_GREETING);
        assert_eq!(transcript.len(), 1);
        let after_reset = transcript.messages()[0].id;
        assert!(after_reset > second);
        assert_eq!(after_reset.to_string(), format!("msg-{}", after_reset.get()));
    }

    #[test]
    fn test_display_time_format() {
        let transcript = Transcript::with_greeting(WELCOME_GREETING);
        let shown = transcript.messages()[0].display_time();
        assert_eq!(shown.len(), 5);
        assert_eq!(shown.chars().nth(2), Some(':'));
    }
}
