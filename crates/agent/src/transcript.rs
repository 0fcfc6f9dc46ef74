//! Session transcript
//!
//! Append-only list of messages plus, while a reply is being composed, a
//! trailing typing placeholder. Messages are immutable once appended except
//! for their rating.

use harvest_chat_core::{Message, MessageId, Rating};

use crate::error::SessionError;

/// One row in the transcript
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Message(Message),
    /// Shown while the bot is "typing"
    Typing,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// Transcript seeded with a welcome message
    pub fn new(welcome: Message) -> Self {
        Self {
            entries: vec![Entry::Message(welcome)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.entries.push(Entry::Message(message));
    }

    /// Add a message, keeping the typing placeholder last
    pub fn insert_before_typing(&mut self, message: Message) {
        match self.entries.iter().position(|e| matches!(e, Entry::Typing)) {
            Some(at) => self.entries.insert(at, Entry::Message(message)),
            None => self.entries.push(Entry::Message(message)),
        }
    }

    /// Add the typing placeholder; returns false if one is already shown
    pub fn begin_typing(&mut self) -> bool {
        if self.is_typing() {
            return false;
        }
        self.entries.push(Entry::Typing);
        true
    }

    /// Swap the placeholder for the finished reply in one step
    pub fn finish_typing(&mut self, reply: Message) {
        self.entries.retain(|e| !matches!(e, Entry::Typing));
        self.entries.push(Entry::Message(reply));
    }

    /// Drop the placeholder without a reply
    pub fn cancel_typing(&mut self) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !matches!(e, Entry::Typing));
        before != self.entries.len()
    }

    pub fn is_typing(&self) -> bool {
        self.entries.iter().any(|e| matches!(e, Entry::Typing))
    }

    /// Start over with only the welcome message
    pub fn reset(&mut self, welcome: Message) {
        self.entries.clear();
        self.entries.push(Entry::Message(welcome));
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Messages only, placeholder skipped
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Message(m) => Some(m),
            Entry::Typing => None,
        })
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages().find(|m| m.id == id)
    }

    /// Number of messages, placeholder excluded
    pub fn len(&self) -> usize {
        self.messages().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages().last()
    }

    /// Record helpfulness feedback on a bot message
    ///
    /// Rating again overwrites the previous rating.
    pub fn rate(&mut self, id: MessageId, rating: Rating) -> Result<(), SessionError> {
        let message = self
            .entries
            .iter_mut()
            .find_map(|e| match e {
                Entry::Message(m) if m.id == id => Some(m),
                _ => None,
            })
            .ok_or(SessionError::UnknownMessage(id))?;

        if !message.is_bot() {
            return Err(SessionError::NotRatable(id));
        }
        message.rating = Some(rating);
        Ok(())
    }

    /// Text to put on the clipboard for one message
    pub fn copy_text(&self, id: MessageId) -> Option<String> {
        self.get(id).map(|m| m.text.clone())
    }

    /// Plain-text rendering of the whole conversation
    pub fn export(&self) -> String {
        self.messages()
            .map(|m| {
                format!(
                    "[{}] {}: {}",
                    m.timestamp.format("%Y-%m-%d %H:%M"),
                    m.sender.label(),
                    m.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
