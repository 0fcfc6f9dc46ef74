//! Conversation context
//!
//! Session-scoped tally of what the visitor has asked about. Products and
//! topics only ever grow within a session; [`ConversationContext::reset`]
//! returns everything to the initial state in one step.

use chrono::{DateTime, Utc};
use harvest_chat_core::{EntitySet, ProductId, Topic};
use serde::{Deserialize, Serialize};

/// Running state for one chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    topics: Vec<Topic>,
    products: Vec<ProductId>,
    last_query: Option<String>,
    query_count: u32,
    session_start: DateTime<Utc>,
}

/// What a single [`ConversationContext::record`] call added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextUpdate {
    pub new_products: Vec<ProductId>,
    pub new_topics: Vec<Topic>,
}

impl ContextUpdate {
    pub fn is_empty(&self) -> bool {
        self.new_products.is_empty() && self.new_topics.is_empty()
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationContext {
    pub fn new() -> Self {
        Self {
            topics: Vec::new(),
            products: Vec::new(),
            last_query: None,
            query_count: 0,
            session_start: Utc::now(),
        }
    }

    /// Fold one user message into the context
    pub fn record(&mut self, text: &str, entities: &EntitySet) -> ContextUpdate {
        self.query_count += 1;
        self.last_query = Some(text.to_string());

        let mut update = ContextUpdate::default();
        for product in &entities.products {
            if !self.products.contains(product) {
                self.products.push(*product);
                update.new_products.push(*product);
            }
        }
        for topic in &entities.topics {
            if !self.topics.contains(topic) {
                self.topics.push(*topic);
                update.new_topics.push(*topic);
            }
        }

        if !update.is_empty() {
            tracing::debug!(
                query_count = self.query_count,
                new_products = ?update.new_products,
                new_topics = ?update.new_topics,
                "Context updated"
            );
        }

        update
    }

    /// Back to the empty initial state with a fresh start time
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Topics in first-mention order
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Products in first-mention order
    pub fn products(&self) -> &[ProductId] {
        &self.products
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn query_count(&self) -> u32 {
        self.query_count
    }

    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    pub fn has_seen_product(&self, product: ProductId) -> bool {
        self.products.contains(&product)
    }

    pub fn has_seen_topic(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    pub fn is_empty(&self) -> bool {
        self.query_count == 0 && self.products.is_empty() && self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(products: &[ProductId], topics: &[Topic]) -> EntitySet {
        EntitySet {
            products: products.to_vec(),
            topics: topics.to_vec(),
        }
    }

    #[test]
    fn test_record_counts_queries() {
        let mut ctx = ConversationContext::new();
        ctx.record("hello", &EntitySet::new());
        ctx.record("anyone there?", &EntitySet::new());
        assert_eq!(ctx.query_count(), 2);
        assert_eq!(ctx.last_query(), Some("anyone there?"));
        assert!(ctx.products().is_empty());
    }

    #[test]
    fn test_products_never_duplicate() {
        let mut ctx = ConversationContext::new();
        let first = ctx.record("olive oil?", &entities(&[ProductId::OliveOil], &[]));
        let second = ctx.record("olive oil again", &entities(&[ProductId::OliveOil], &[]));

        assert_eq!(first.new_products, vec![ProductId::OliveOil]);
        assert!(second.is_empty());
        assert_eq!(ctx.products(), &[ProductId::OliveOil]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut ctx = ConversationContext::new();
        ctx.record("", &entities(&[ProductId::Pear], &[Topic::Shipping]));
        ctx.record("", &entities(&[ProductId::Apple, ProductId::Pear], &[Topic::Pricing]));
        assert_eq!(ctx.products(), &[ProductId::Pear, ProductId::Apple]);
        assert_eq!(ctx.topics(), &[Topic::Shipping, Topic::Pricing]);
        assert!(ctx.has_seen_product(ProductId::Apple));
        assert!(!ctx.has_seen_product(ProductId::Orange));
        assert!(ctx.has_seen_topic(Topic::Pricing));
        assert!(!ctx.has_seen_topic(Topic::Quality));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ctx = ConversationContext::new();
        ctx.record("apples", &entities(&[ProductId::Apple], &[Topic::Pricing]));
        ctx.reset();
        assert!(ctx.is_empty());
        assert!(!ctx.has_seen_product(ProductId::Apple));
        assert_eq!(ctx.last_query(), None);
        assert!(ctx.topics().is_empty());
    }
}
