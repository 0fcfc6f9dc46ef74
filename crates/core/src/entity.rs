//! Entity identifiers
//!
//! Products and topics are closed sets. Everything keyed by them (catalog
//! records, keyword tables, templates) is built with exhaustive matches so a
//! new variant cannot ship without its data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Products carried in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductId {
    OliveOil,
    RapeseedOil,
    Orange,
    Apple,
    Peach,
    Pear,
    Artichoke,
}

impl ProductId {
    /// Every product, in catalog order
    pub const ALL: [ProductId; 7] = [
        ProductId::OliveOil,
        ProductId::RapeseedOil,
        ProductId::Orange,
        ProductId::Apple,
        ProductId::Peach,
        ProductId::Pear,
        ProductId::Artichoke,
    ];

    /// Stable identifier used in URLs and payloads
    pub fn slug(&self) -> &'static str {
        match self {
            ProductId::OliveOil => "olive-oil",
            ProductId::RapeseedOil => "rapeseed-oil",
            ProductId::Orange => "orange",
            ProductId::Apple => "apple",
            ProductId::Peach => "peach",
            ProductId::Pear => "pear",
            ProductId::Artichoke => "artichoke",
        }
    }

    /// Slug with hyphens replaced by spaces, as it appears in prose
    pub fn match_key(&self) -> String {
        self.slug().replace('-', " ")
    }

    /// Fresh produce as opposed to pressed oils
    pub fn is_produce(&self) -> bool {
        !matches!(self, ProductId::OliveOil | ProductId::RapeseedOil)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Error returned when a slug names no known product
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product: {0}")]
pub struct UnknownProduct(pub String);

impl FromStr for ProductId {
    type Err = UnknownProduct;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(' ', "-");
        ProductId::ALL
            .into_iter()
            .find(|p| p.slug() == normalized)
            .ok_or_else(|| UnknownProduct(s.to_string()))
    }
}

/// Conversation topics tracked across a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Pricing,
    Shipping,
    Quality,
    Schedule,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Pricing, Topic::Shipping, Topic::Quality, Topic::Schedule];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Pricing => "pricing",
            Topic::Shipping => "shipping",
            Topic::Quality => "quality",
            Topic::Schedule => "schedule",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized product or topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum EntityTag {
    Product(ProductId),
    Topic(Topic),
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityTag::Product(p) => write!(f, "product:{}", p),
            EntityTag::Topic(t) => write!(f, "topic:{}", t),
        }
    }
}

/// Entities extracted from one utterance
///
/// Products and topics keep the order in which they were detected and never
/// hold duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub products: Vec<ProductId>,
    pub topics: Vec<Topic>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&mut self, product: ProductId) -> bool {
        if self.products.contains(&product) {
            return false;
        }
        self.products.push(product);
        true
    }

    pub fn insert_topic(&mut self, topic: Topic) -> bool {
        if self.topics.contains(&topic) {
            return false;
        }
        self.topics.push(topic);
        true
    }

    pub fn contains_product(&self, product: ProductId) -> bool {
        self.products.contains(&product)
    }

    pub fn contains_topic(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.topics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len() + self.topics.len()
    }

    /// Flatten into tags, products first
    pub fn tags(&self) -> Vec<EntityTag> {
        self.products
            .iter()
            .copied()
            .map(EntityTag::Product)
            .chain(self.topics.iter().copied().map(EntityTag::Topic))
            .collect()
    }
}
