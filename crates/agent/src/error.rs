//! Session errors
//!
//! The response engine itself cannot fail; these cover misuse of a session
//! by the front end.

use harvest_chat_core::MessageId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyInput,

    #[error("a reply is still being composed")]
    ReplyPending,

    #[error("session is closed")]
    Closed,

    #[error("no message with id {0}")]
    UnknownMessage(MessageId),

    #[error("message {0} cannot be rated")]
    NotRatable(MessageId),

    #[error("message {message_id} has no suggestion at index {index}")]
    NoSuchSuggestion { message_id: MessageId, index: usize },
}
