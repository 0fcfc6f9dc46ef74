//! Transcript messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::action::QuickActionId;
use crate::entity::{EntityTag, ProductId};

/// Unique message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "Assistant",
        }
    }
}

/// How a front end should render a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Text,
    Suggestions,
    ProductCard,
    Actions,
}

/// Structured data attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MessagePayload {
    Suggestions(Vec<String>),
    Product(ProductId),
    Actions(Vec<QuickActionId>),
}

/// Helpfulness feedback on a bot message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Up,
    Down,
}

impl Rating {
    /// +1 or -1
    pub fn value(&self) -> i8 {
        match self {
            Rating::Up => 1,
            Rating::Down => -1,
        }
    }
}

/// One exchanged utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub kind: ResponseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<MessagePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<EntityTag>,
}

impl Message {
    /// User message carrying the entities found in it
    pub fn user(text: impl Into<String>, entities: Vec<EntityTag>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            kind: ResponseKind::Text,
            payload: None,
            rating: None,
            entities,
        }
    }

    /// Bot message of the given kind
    pub fn bot(text: impl Into<String>, kind: ResponseKind, payload: Option<MessagePayload>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            kind,
            payload,
            rating: None,
            entities: Vec::new(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("hi", Vec::new());
        let b = Message::user("hi", Vec::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_rating_values() {
        assert_eq!(Rating::Up.value(), 1);
        assert_eq!(Rating::Down.value(), -1);
    }

    #[test]
    fn test_bot_message_skips_empty_fields() {
        let msg = Message::bot("hello", ResponseKind::Text, None);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "bot");
        assert_eq!(json["kind"], "text");
        assert!(json.get("payload").is_none());
        assert!(json.get("entities").is_none());
    }
}
