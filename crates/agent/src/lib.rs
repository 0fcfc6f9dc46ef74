//! Storefront chat agent
//!
//! Rule-based response engine plus the session that drives it:
//! - Context accumulation across turns
//! - Ordered intent rules (first match wins)
//! - Typing simulation and delayed UI actions
//! - Transcript with rating, copy and export

pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod intent;
pub mod scheduler;
pub mod session;
pub mod transcript;

pub use context::{ContextUpdate, ConversationContext};
pub use engine::{Reply, ResponseEngine, Turn};
pub use error::SessionError;
pub use events::SessionEvent;
pub use intent::{
    default_rules, resolve_produce, DetectedIntent, Intent, IntentRule, IntentSelector, Predicate,
    Responder, PRODUCE_ORDER,
};
pub use scheduler::{ActionScheduler, ScheduledAction};
pub use session::{ChatSession, PendingReply};
pub use transcript::{Entry, Transcript};
