//! Intent Rules
//!
//! Ordered keyword rules that decide which canned reply answers a message.
//! The first rule whose predicate matches the lowercased input wins, so the
//! order of [`default_rules`] is part of the behavior: "price of olive oil"
//! is a pricing question, not an olive oil question.

use harvest_chat_config::TemplateKey;
use harvest_chat_core::{ProductId, UiAction};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intent behind a visitor message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Pricing,
    OliveOil,
    RapeseedOil,
    Produce,
    Shipping,
    Quality,
    Company,
    Contact,
    Consultation,
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Pricing => "pricing",
            Intent::OliveOil => "olive_oil",
            Intent::RapeseedOil => "rapeseed_oil",
            Intent::Produce => "produce",
            Intent::Shipping => "shipping",
            Intent::Quality => "quality",
            Intent::Company => "company",
            Intent::Contact => "contact",
            Intent::Consultation => "consultation",
            Intent::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Any keyword is a substring of the lowercased input
    AnyKeyword(&'static [&'static str]),
    /// Always matches; used for the terminal fallback
    Always,
}

impl Predicate {
    /// Returns the keyword that matched, or `""` for [`Predicate::Always`]
    pub fn matches(&self, lower: &str) -> Option<&'static str> {
        match self {
            Predicate::AnyKeyword(keywords) => keywords.iter().copied().find(|k| lower.contains(k)),
            Predicate::Always => Some(""),
        }
    }
}

/// How a matched rule builds its reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Responder {
    /// Canned template, optionally opening another surface afterwards
    Template {
        key: TemplateKey,
        action: Option<UiAction>,
    },
    /// Detail card for one product
    Product(ProductId),
    /// A specific fruit if one is named, otherwise the produce overview
    Produce,
}

/// One predicate/responder pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentRule {
    pub intent: Intent,
    pub predicate: Predicate,
    pub responder: Responder,
}

/// Fixed lookup order when a produce message names a fruit
pub const PRODUCE_ORDER: [ProductId; 5] = [
    ProductId::Orange,
    ProductId::Apple,
    ProductId::Peach,
    ProductId::Pear,
    ProductId::Artichoke,
];

/// Rules in priority order; the last one always matches
pub fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule {
            intent: Intent::Pricing,
            predicate: Predicate::AnyKeyword(&[
                "price",
                "cost",
                "quote",
                "pricing",
                "minimum order",
                "moq",
            ]),
            responder: Responder::Template {
                key: TemplateKey::PricingRedirect,
                action: Some(UiAction::OpenQuoteForm),
            },
        },
        IntentRule {
            intent: Intent::OliveOil,
            predicate: Predicate::AnyKeyword(&["olive"]),
            responder: Responder::Product(ProductId::OliveOil),
        },
        IntentRule {
            intent: Intent::RapeseedOil,
            predicate: Predicate::AnyKeyword(&["rapeseed", "canola"]),
            responder: Responder::Product(ProductId::RapeseedOil),
        },
        IntentRule {
            intent: Intent::Produce,
            predicate: Predicate::AnyKeyword(&[
                "fruit",
                "orange",
                "apple",
                "produce",
                "peach",
                "pear",
                "artichoke",
            ]),
            responder: Responder::Produce,
        },
        IntentRule {
            intent: Intent::Shipping,
            predicate: Predicate::AnyKeyword(&[
                "shipping",
                "delivery",
                "deliver",
                "logistics",
                "transport",
            ]),
            responder: Responder::Template {
                key: TemplateKey::Shipping,
                action: None,
            },
        },
        IntentRule {
            intent: Intent::Quality,
            predicate: Predicate::AnyKeyword(&["quality", "standard", "certif", "compliance"]),
            responder: Responder::Template {
                key: TemplateKey::Quality,
                action: None,
            },
        },
        IntentRule {
            intent: Intent::Company,
            predicate: Predicate::AnyKeyword(&["company", "about", "who are you", "history"]),
            responder: Responder::Template {
                key: TemplateKey::Company,
                action: None,
            },
        },
        IntentRule {
            intent: Intent::Contact,
            predicate: Predicate::AnyKeyword(&["contact", "reach", "phone", "email"]),
            responder: Responder::Template {
                key: TemplateKey::Contact,
                action: Some(UiAction::OpenContactForm),
            },
        },
        IntentRule {
            intent: Intent::Consultation,
            predicate: Predicate::AnyKeyword(&[
                "call",
                "meeting",
                "schedule",
                "consultation",
                "appointment",
            ]),
            responder: Responder::Template {
                key: TemplateKey::Consultation,
                action: Some(UiAction::OpenAppointmentScheduler),
            },
        },
        IntentRule {
            intent: Intent::Fallback,
            predicate: Predicate::Always,
            responder: Responder::Template {
                key: TemplateKey::Fallback,
                action: None,
            },
        },
    ]
}

/// Result of running the rule list over one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedIntent {
    pub rule: IntentRule,
    /// Position of the winning rule in the list
    pub rank: usize,
    /// Keyword that triggered the rule; empty for the fallback
    pub keyword: &'static str,
}

impl DetectedIntent {
    pub fn intent(&self) -> Intent {
        self.rule.intent
    }
}

/// First-match intent selector
#[derive(Debug, Clone)]
pub struct IntentSelector {
    rules: Vec<IntentRule>,
    fallback: IntentRule,
}

impl Default for IntentSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentSelector {
    /// Selector over [`default_rules`]
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    /// Selector over custom rules
    ///
    /// If no rule in the list always matches, the built-in fallback is used
    /// when nothing else does.
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self {
            rules,
            fallback: IntentRule {
                intent: Intent::Fallback,
                predicate: Predicate::Always,
                responder: Responder::Template {
                    key: TemplateKey::Fallback,
                    action: None,
                },
            },
        }
    }

    /// Pick the first rule matching `text`
    pub fn detect(&self, text: &str) -> DetectedIntent {
        let lower = text.to_lowercase();

        let detected = self
            .rules
            .iter()
            .enumerate()
            .find_map(|(rank, rule)| {
                rule.predicate.matches(&lower).map(|keyword| DetectedIntent {
                    rule: *rule,
                    rank,
                    keyword,
                })
            })
            .unwrap_or(DetectedIntent {
                rule: self.fallback,
                rank: self.rules.len(),
                keyword: "",
            });

        tracing::debug!(
            intent = %detected.intent(),
            rank = detected.rank,
            keyword = detected.keyword,
            "Intent selected"
        );

        detected
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Get the rule for an intent
    pub fn get_rule(&self, intent: Intent) -> Option<&IntentRule> {
        self.rules.iter().find(|r| r.intent == intent)
    }

    /// List all intents in priority order
    pub fn list_intents(&self) -> Vec<Intent> {
        self.rules.iter().map(|r| r.intent).collect()
    }
}

/// First fruit from [`PRODUCE_ORDER`] named in `text`
pub fn resolve_produce(text: &str) -> Option<ProductId> {
    let lower = text.to_lowercase();
    PRODUCE_ORDER
        .into_iter()
        .find(|p| lower.contains(p.match_key().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_priority_order() {
        let selector = IntentSelector::new();
        assert_eq!(
            selector.list_intents(),
            vec![
                Intent::Pricing,
                Intent::OliveOil,
                Intent::RapeseedOil,
                Intent::Produce,
                Intent::Shipping,
                Intent::Quality,
                Intent::Company,
                Intent::Contact,
                Intent::Consultation,
                Intent::Fallback,
            ]
        );
    }

    #[test]
    fn test_pricing_beats_product() {
        let selector = IntentSelector::new();
        let detected = selector.detect("What's the price of olive oil?");
        assert_eq!(detected.intent(), Intent::Pricing);
        assert_eq!(detected.keyword, "price");
        assert_eq!(detected.rank, 0);
    }

    #[test]
    fn test_product_rules() {
        let selector = IntentSelector::new();
        assert_eq!(selector.detect("Tell me about your olive oil").intent(), Intent::OliveOil);
        assert_eq!(selector.detect("Do you have CANOLA?").intent(), Intent::RapeseedOil);
        assert_eq!(selector.detect("Which fruit do you export?").intent(), Intent::Produce);
    }

    #[test]
    fn test_static_rules() {
        let selector = IntentSelector::new();
        assert_eq!(selector.detect("How long does shipping take?").intent(), Intent::Shipping);
        assert_eq!(selector.detect("What quality standards apply?").intent(), Intent::Quality);
        assert_eq!(selector.detect("Who are you?").intent(), Intent::Company);
        assert_eq!(selector.detect("What's your phone number?").intent(), Intent::Contact);
        assert_eq!(selector.detect("Can we book a meeting?").intent(), Intent::Consultation);
    }

    #[test]
    fn test_contact_precedes_consultation() {
        // "reach" and "call" both present; contact is declared first
        let selector = IntentSelector::new();
        assert_eq!(selector.detect("How can I reach you for a call?").intent(), Intent::Contact);
    }

    #[test]
    fn test_fallback() {
        let selector = IntentSelector::new();
        let detected = selector.detect("hello");
        assert_eq!(detected.intent(), Intent::Fallback);
        assert_eq!(detected.keyword, "");
        assert_eq!(selector.detect("").intent(), Intent::Fallback);
    }

    #[test]
    fn test_custom_rules_without_fallback() {
        let selector = IntentSelector::with_rules(vec![IntentRule {
            intent: Intent::Shipping,
            predicate: Predicate::AnyKeyword(&["ship"]),
            responder: Responder::Template {
                key: TemplateKey::Shipping,
                action: None,
            },
        }]);
        assert_eq!(selector.detect("ship it").intent(), Intent::Shipping);
        let detected = selector.detect("price?");
        assert_eq!(detected.intent(), Intent::Fallback);
        assert_eq!(detected.rank, 1);
    }

    #[test]
    fn test_get_rule() {
        let selector = IntentSelector::new();
        let rule = selector.get_rule(Intent::Pricing).unwrap();
        assert!(matches!(
            rule.responder,
            Responder::Template {
                key: TemplateKey::PricingRedirect,
                action: Some(UiAction::OpenQuoteForm)
            }
        ));
        assert!(selector.get_rule(Intent::Fallback).is_some());

        let custom = IntentSelector::with_rules(Vec::new());
        assert!(custom.get_rule(Intent::Pricing).is_none());
    }

    #[test]
    fn test_resolve_produce_fixed_order() {
        assert_eq!(resolve_produce("apples and peaches"), Some(ProductId::Apple));
        assert_eq!(resolve_produce("peaches and apples"), Some(ProductId::Apple));
        assert_eq!(resolve_produce("pears and oranges"), Some(ProductId::Orange));
        assert_eq!(resolve_produce("Artichokes"), Some(ProductId::Artichoke));
        assert_eq!(resolve_produce("what fruit do you have"), None);
    }
}
