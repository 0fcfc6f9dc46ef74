//! Text processing for the storefront chat
//!
//! Currently a single stage: entity extraction over free-text visitor input.

pub mod entities;

pub use entities::{topic_keywords, EntityExtractor};
