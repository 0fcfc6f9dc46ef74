//! Entity extraction
//!
//! Finds known products and topic tags in visitor input:
//! - Products: the product slug with hyphens as spaces ("olive oil")
//! - Topics: any keyword from the topic's list
//!
//! Matching is a case-insensitive substring test, so "apples" matches
//! `apple` and "Olive Oil prices" matches both `olive-oil` and `pricing`.
//!
//! # Example
//!
//! ```
//! use harvest_chat_core::{ProductId, Topic};
//! use harvest_chat_text_processing::EntityExtractor;
//!
//! let extractor = EntityExtractor::new();
//! let entities = extractor.extract("What's your price for apples?");
//!
//! assert!(entities.contains_product(ProductId::Apple));
//! assert!(entities.contains_topic(Topic::Pricing));
//! ```

use harvest_chat_core::{EntitySet, ProductId, Topic};

/// Default keyword list for a topic
pub fn topic_keywords(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::Pricing => &["price", "cost", "quote", "pricing", "minimum order", "moq"],
        Topic::Shipping => &["shipping", "delivery", "deliver", "logistics", "transport"],
        Topic::Quality => &["quality", "standard", "certif", "compliance"],
        Topic::Schedule => &["schedule", "meeting", "call", "consultation", "appointment"],
    }
}

/// Product and topic extractor
///
/// Holds lowercased match keys so each call only lowercases the input.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    product_keys: Vec<(ProductId, String)>,
    topic_keys: Vec<(Topic, Vec<String>)>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor {
    /// Extractor over the full catalog and default topic keywords
    pub fn new() -> Self {
        Self {
            product_keys: ProductId::ALL
                .into_iter()
                .map(|id| (id, id.match_key()))
                .collect(),
            topic_keys: Topic::ALL
                .into_iter()
                .map(|topic| {
                    let keys = topic_keywords(topic).iter().map(|k| k.to_lowercase()).collect();
                    (topic, keys)
                })
                .collect(),
        }
    }

    /// Add keywords to a topic (builder pattern)
    pub fn with_topic_keywords<I, S>(mut self, topic: Topic, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some((_, keys)) = self.topic_keys.iter_mut().find(|(t, _)| *t == topic) {
            for keyword in keywords {
                let keyword = keyword.as_ref().trim().to_lowercase();
                if !keyword.is_empty() && !keys.contains(&keyword) {
                    keys.push(keyword);
                }
            }
        }
        self
    }

    /// Extract every known product and topic mentioned in `text`
    pub fn extract(&self, text: &str) -> EntitySet {
        let lower = text.to_lowercase();
        let mut entities = EntitySet::new();

        for (id, key) in &self.product_keys {
            if lower.contains(key.as_str()) {
                entities.insert_product(*id);
            }
        }

        for (topic, keys) in &self.topic_keys {
            if keys.iter().any(|k| lower.contains(k.as_str())) {
                entities.insert_topic(*topic);
            }
        }

        if !entities.is_empty() {
            tracing::trace!(
                products = entities.products.len(),
                topics = entities.topics.len(),
                "Extracted entities"
            );
        }

        entities
    }

    /// Products only
    pub fn extract_products(&self, text: &str) -> Vec<ProductId> {
        self.extract(text).products
    }

    /// Topics only
    pub fn extract_topics(&self, text: &str) -> Vec<Topic> {
        self.extract(text).topics
    }
}
