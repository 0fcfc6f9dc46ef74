//! Core types for the storefront chat engine
//!
//! Shared vocabulary for every other crate: product and topic identifiers,
//! transcript messages, and the UI actions a reply can trigger.

pub mod action;
pub mod entity;
pub mod message;

pub use action::{ActionSink, NoopSink, QuickActionId, UiAction};
pub use entity::{EntitySet, EntityTag, ProductId, Topic, UnknownProduct};
pub use message::{Message, MessageId, MessagePayload, Rating, ResponseKind, Sender};
