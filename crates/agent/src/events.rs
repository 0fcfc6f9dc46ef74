//! Session events for front ends

use std::time::Duration;

use harvest_chat_core::{Message, MessageId, Rating, UiAction};

/// Something observable happened in a chat session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started { session_id: String },
    MessageAppended { message: Message },
    TypingStarted { delay: Duration },
    TypingStopped,
    ActionScheduled { action: UiAction, delay: Duration },
    ActionFired { action: UiAction },
    Rated { message_id: MessageId, rating: Rating },
    Cleared,
    Closed,
}
