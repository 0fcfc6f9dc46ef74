//! Chat Session
//!
//! One open chat widget. Ties the response engine to a transcript, the
//! conversation context and the delayed-action scheduler, and simulates the
//! bot typing before each reply appears.

use std::sync::Arc;
use std::time::Duration;

use harvest_chat_config::{ChatConfig, ConfigError, TypingConfig};
use harvest_chat_core::{
    ActionSink, Message, MessageId, MessagePayload, ProductId, QuickActionId, Rating, UiAction,
};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::{AbortHandle, JoinHandle};

use crate::context::ConversationContext;
use crate::engine::ResponseEngine;
use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::intent::Intent;
use crate::scheduler::{ActionScheduler, ScheduledAction};
use crate::transcript::{Entry, Transcript};

/// Mutable per-session state
struct SessionState {
    transcript: Transcript,
    context: ConversationContext,
    /// Task that will append the reply being composed
    pending: Option<AbortHandle>,
    /// Bumped on clear/close so a stale reply task never lands
    generation: u64,
    closed: bool,
}

impl SessionState {
    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.transcript.cancel_typing();
        self.generation += 1;
    }
}

/// A reply that is being "typed"
#[derive(Debug)]
pub struct PendingReply {
    /// Id of the user message that triggered it
    pub user_message: MessageId,
    pub intent: Intent,
    /// How long the typing placeholder stays up
    pub delay: Duration,
    /// Opens scheduled by this reply
    pub actions: Vec<ScheduledAction>,
    handle: JoinHandle<Option<Message>>,
}

impl PendingReply {
    /// Wait for the reply to appear
    ///
    /// Returns `None` if the session was cleared or closed first.
    pub async fn wait(self) -> Option<Message> {
        self.handle.await.ok().flatten()
    }
}

/// A single chat widget session
pub struct ChatSession {
    session_id: String,
    engine: Arc<ResponseEngine>,
    typing: TypingConfig,
    state: Arc<Mutex<SessionState>>,
    scheduler: ActionScheduler,
    sink: Arc<dyn ActionSink>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl ChatSession {
    /// Create a session seeded with the welcome message
    pub fn new(
        session_id: impl Into<String>,
        engine: Arc<ResponseEngine>,
        config: &ChatConfig,
        sink: Arc<dyn ActionSink>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self::with_events(session_id, engine, config, sink, event_tx)
    }

    /// Create a session publishing on an existing event channel
    ///
    /// Receivers subscribed before this call also see `Started`.
    pub fn with_events(
        session_id: impl Into<String>,
        engine: Arc<ResponseEngine>,
        config: &ChatConfig,
        sink: Arc<dyn ActionSink>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        let session_id = session_id.into();

        let scheduler =
            ActionScheduler::new(Arc::clone(&sink), config.actions.delay()).with_events(event_tx.clone());

        let state = SessionState {
            transcript: Transcript::new(engine.welcome()),
            context: ConversationContext::new(),
            pending: None,
            generation: 0,
            closed: false,
        };

        tracing::info!(session_id = %session_id, "Chat session started");
        let _ = event_tx.send(SessionEvent::Started {
            session_id: session_id.clone(),
        });

        Self {
            session_id,
            engine,
            typing: config.typing,
            state: Arc::new(Mutex::new(state)),
            scheduler,
            sink,
            event_tx,
        }
    }

    /// Build the engine from settings as well
    pub fn from_config(
        session_id: impl Into<String>,
        config: &ChatConfig,
        sink: Arc<dyn ActionSink>,
    ) -> Result<Self, ConfigError> {
        let engine = Arc::new(ResponseEngine::from_config(config)?);
        Ok(Self::new(session_id, engine, config, sink))
    }

    /// Submit visitor text
    ///
    /// The user message and typing placeholder are in the transcript when this
    /// returns; the reply replaces the placeholder after the typing delay.
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, text: &str) -> Result<PendingReply, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let mut state = self.state.lock();
        if state.closed {
            return Err(SessionError::Closed);
        }
        if state.transcript.is_typing() {
            tracing::debug!(session_id = %self.session_id, "Submit rejected while composing");
            return Err(SessionError::ReplyPending);
        }

        let turn = self.engine.process(text, &mut state.context);
        let user = Message::user(text, turn.entities.tags());
        let user_id = user.id;
        state.transcript.push(user.clone());
        state.transcript.begin_typing();
        state.generation += 1;
        let generation = state.generation;

        let reply = turn.reply;
        let intent = reply.intent;
        let delay = self.typing.delay_for(&reply.text);
        let actions: Vec<ScheduledAction> =
            reply.actions.iter().map(|a| self.scheduler.schedule(*a)).collect();
        let message = reply.into_message();

        let shared = Arc::clone(&self.state);
        let event_tx = self.event_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = shared.lock();
                if state.closed || state.generation != generation {
                    return None;
                }
                state.transcript.finish_typing(message.clone());
                state.pending = None;
            }
            let _ = event_tx.send(SessionEvent::TypingStopped);
            let _ = event_tx.send(SessionEvent::MessageAppended {
                message: message.clone(),
            });
            Some(message)
        });
        state.pending = Some(handle.abort_handle());
        drop(state);

        tracing::info!(
            session_id = %self.session_id,
            intent = %intent,
            delay_ms = delay.as_millis() as u64,
            actions = actions.len(),
            "Reply composed"
        );
        let _ = self.event_tx.send(SessionEvent::MessageAppended { message: user });
        let _ = self.event_tx.send(SessionEvent::TypingStarted { delay });

        Ok(PendingReply {
            user_message: user_id,
            intent,
            delay,
            actions,
            handle,
        })
    }

    /// Submit the `index`th suggestion attached to a bot message
    pub fn choose_suggestion(
        &self,
        message_id: MessageId,
        index: usize,
    ) -> Result<PendingReply, SessionError> {
        let suggestion = {
            let state = self.state.lock();
            let message = state
                .transcript
                .get(message_id)
                .ok_or(SessionError::UnknownMessage(message_id))?;
            let suggestion = match &message.payload {
                Some(MessagePayload::Suggestions(list)) => list.get(index).cloned(),
                _ => None,
            };
            suggestion.ok_or(SessionError::NoSuchSuggestion { message_id, index })?
        };
        self.submit(&suggestion)
    }

    /// Open a quick-action surface right away
    pub fn trigger_quick_action(&self, id: QuickActionId) -> Result<UiAction, SessionError> {
        if self.state.lock().closed {
            return Err(SessionError::Closed);
        }
        let action = id.action();
        self.sink.open(action);
        tracing::info!(session_id = %self.session_id, quick_action = id.as_str(), "Quick action");
        let _ = self.event_tx.send(SessionEvent::ActionFired { action });
        Ok(action)
    }

    /// Append a product card for `id`
    ///
    /// While a reply is being composed the card goes ahead of the placeholder,
    /// so the reply still lands last.
    pub fn show_product(&self, id: ProductId) -> Result<Message, SessionError> {
        let card = self.engine.product_card(id);
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(SessionError::Closed);
            }
            state.transcript.insert_before_typing(card.clone());
        }
        let _ = self.event_tx.send(SessionEvent::MessageAppended {
            message: card.clone(),
        });
        Ok(card)
    }

    /// Reset context and transcript
    ///
    /// Aborts a reply being composed. Opens already scheduled still fire.
    pub fn clear(&self) -> Result<(), SessionError> {
        let welcome = self.engine.welcome();
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(SessionError::Closed);
            }
            state.abort_pending();
            state.context.reset();
            state.transcript.reset(welcome);
        }
        tracing::info!(session_id = %self.session_id, "Chat cleared");
        let _ = self.event_tx.send(SessionEvent::Cleared);
        Ok(())
    }

    /// Tear the session down, canceling the pending reply and scheduled opens
    pub fn close(&self) {
        {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.abort_pending();
        }
        let canceled = self.scheduler.cancel_all();
        tracing::info!(session_id = %self.session_id, canceled, "Chat session closed");
        let _ = self.event_tx.send(SessionEvent::Closed);
    }

    pub fn rate(&self, message_id: MessageId, rating: Rating) -> Result<(), SessionError> {
        self.state.lock().transcript.rate(message_id, rating)?;
        tracing::debug!(%message_id, rating = rating.value(), "Message rated");
        let _ = self.event_tx.send(SessionEvent::Rated { message_id, rating });
        Ok(())
    }

    /// Clipboard text for one message
    pub fn copy_message(&self, message_id: MessageId) -> Result<String, SessionError> {
        self.state
            .lock()
            .transcript
            .copy_text(message_id)
            .ok_or(SessionError::UnknownMessage(message_id))
    }

    pub fn export_transcript(&self) -> String {
        self.state.lock().transcript.export()
    }

    /// Snapshot of the conversation context
    pub fn context(&self) -> ConversationContext {
        self.state.lock().context.clone()
    }

    /// Snapshot of the transcript messages
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().transcript.messages().cloned().collect()
    }

    /// Snapshot including the typing placeholder
    pub fn entries(&self) -> Vec<Entry> {
        self.state.lock().transcript.entries().to_vec()
    }

    /// Whether the typing placeholder is showing
    pub fn is_composing(&self) -> bool {
        self.state.lock().transcript.is_typing()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Opens that have not fired yet
    pub fn pending_actions(&self) -> Vec<ScheduledAction> {
        self.scheduler.pending()
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn engine(&self) -> &ResponseEngine {
        &self.engine
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.state.lock().abort_pending();
    }
}
