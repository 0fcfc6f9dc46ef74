//! Response Engine
//!
//! Turns one visitor message into a reply:
//!
//! ```text
//! text → EntityExtractor → ConversationContext::record → IntentSelector → template → Reply
//! ```
//!
//! The engine is synchronous and infallible. Timing (typing delay, delayed UI
//! actions) belongs to the session.

use std::sync::Arc;

use harvest_chat_config::{
    catalog, constants, ChatConfig, ConfigError, ProductRecord, ResponseTemplates, TemplateKey,
};
use harvest_chat_core::{
    EntitySet, Message, MessagePayload, ProductId, QuickActionId, ResponseKind, UiAction,
};
use harvest_chat_text_processing::EntityExtractor;

use crate::context::ConversationContext;
use crate::intent::{resolve_produce, DetectedIntent, Intent, IntentSelector, Responder};

/// Suggestions attached to the fallback reply
const FALLBACK_SUGGESTIONS: [&str; 4] = [
    "Tell me about your olive oil",
    "What fruit do you export?",
    "How does shipping work?",
    "How can I get a quote?",
];

/// A composed bot reply
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub kind: ResponseKind,
    pub payload: Option<MessagePayload>,
    pub intent: Intent,
    /// Surfaces to open after the configured delay
    pub actions: Vec<UiAction>,
}

impl Reply {
    /// Materialize as a transcript message
    pub fn into_message(self) -> Message {
        Message::bot(self.text, self.kind, self.payload)
    }
}

/// Everything one user turn produced
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub entities: EntitySet,
    pub reply: Reply,
}

/// Rule-based response engine
#[derive(Debug, Clone)]
pub struct ResponseEngine {
    extractor: EntityExtractor,
    selector: IntentSelector,
    templates: Arc<ResponseTemplates>,
    company_name: String,
}

impl Default for ResponseEngine {
    fn default() -> Self {
        Self::new(constants::company::NAME, ResponseTemplates::default())
    }
}

impl ResponseEngine {
    pub fn new(company_name: impl Into<String>, templates: ResponseTemplates) -> Self {
        Self {
            extractor: EntityExtractor::new(),
            selector: IntentSelector::new(),
            templates: Arc::new(templates),
            company_name: company_name.into(),
        }
    }

    /// Build from settings, loading template overrides if configured
    pub fn from_config(config: &ChatConfig) -> Result<Self, ConfigError> {
        let templates = match &config.templates_path {
            Some(path) => ResponseTemplates::load(path)?,
            None => ResponseTemplates::default(),
        };
        Ok(Self::new(config.company_name.clone(), templates))
    }

    /// Replace the intent selector (builder pattern)
    pub fn with_selector(mut self, selector: IntentSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Replace the entity extractor (builder pattern)
    pub fn with_extractor(mut self, extractor: EntityExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn extract(&self, text: &str) -> EntitySet {
        self.extractor.extract(text)
    }

    pub fn detect(&self, text: &str) -> DetectedIntent {
        self.selector.detect(text)
    }

    /// Full turn: extract, fold into the context, then compose the reply
    pub fn process(&self, text: &str, context: &mut ConversationContext) -> Turn {
        let entities = self.extract(text);
        context.record(text, &entities);
        let reply = self.respond(text);
        Turn { entities, reply }
    }

    /// Compose a reply without touching any session state
    pub fn respond(&self, text: &str) -> Reply {
        let detected = self.detect(text);
        let intent = detected.intent();

        match detected.rule.responder {
            Responder::Template { key, action } => self.template_reply(intent, key, action),
            Responder::Product(id) => self.product_reply(intent, id),
            Responder::Produce => match resolve_produce(text) {
                Some(id) => self.product_reply(intent, id),
                None => self.produce_overview(),
            },
        }
    }

    /// Greeting shown when a session starts or is cleared
    pub fn welcome(&self) -> Message {
        let text = self
            .templates
            .render(TemplateKey::Welcome, &[("company", self.company_name.as_str())]);
        Message::bot(
            text,
            ResponseKind::Actions,
            Some(MessagePayload::Actions(QuickActionId::ALL.to_vec())),
        )
    }

    /// Product card for a catalog entry
    pub fn product_card(&self, id: ProductId) -> Message {
        Message::bot(
            self.render_product(catalog().get(id)),
            ResponseKind::ProductCard,
            Some(MessagePayload::Product(id)),
        )
    }

    pub fn templates(&self) -> &ResponseTemplates {
        &self.templates
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    fn template_reply(&self, intent: Intent, key: TemplateKey, action: Option<UiAction>) -> Reply {
        let text = self.templates.render(
            key,
            &[
                ("company", self.company_name.as_str()),
                ("email", constants::company::EMAIL),
                ("phone", constants::company::PHONE),
                ("address", constants::company::ADDRESS),
                ("hours", constants::company::HOURS),
            ],
        );

        let (kind, payload) = match (key, action) {
            (TemplateKey::Fallback, _) => (
                ResponseKind::Suggestions,
                Some(MessagePayload::Suggestions(
                    FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
                )),
            ),
            (_, Some(action)) => (
                ResponseKind::Actions,
                Some(MessagePayload::Actions(vec![quick_action_for(action)])),
            ),
            (_, None) => (ResponseKind::Text, None),
        };

        Reply {
            text,
            kind,
            payload,
            intent,
            actions: action.into_iter().collect(),
        }
    }

    fn product_reply(&self, intent: Intent, id: ProductId) -> Reply {
        Reply {
            text: self.render_product(catalog().get(id)),
            kind: ResponseKind::Text,
            payload: None,
            intent,
            actions: Vec::new(),
        }
    }

    fn produce_overview(&self) -> Reply {
        let produce: Vec<&ProductRecord> = catalog().produce().collect();
        let products = produce
            .iter()
            .map(|r| format!("- {} ({}), {}", r.name, r.origin, r.season))
            .collect::<Vec<_>>()
            .join("\n");
        let text = self
            .templates
            .render(TemplateKey::FruitOverview, &[("products", products.as_str())]);

        Reply {
            text,
            kind: ResponseKind::Suggestions,
            payload: Some(MessagePayload::Suggestions(
                produce
                    .iter()
                    .map(|r| format!("Tell me about your {}", r.id.match_key()))
                    .collect(),
            )),
            intent: Intent::Produce,
            actions: Vec::new(),
        }
    }

    fn render_product(&self, record: &ProductRecord) -> String {
        let specs = record
            .specs
            .iter()
            .map(|(key, value)| format!("- {}: {}", key, value))
            .collect::<Vec<_>>()
            .join("\n");

        let mut details = String::new();
        for (label, fact) in [
            ("Nutrition", record.nutrition),
            ("Usage", record.usage),
            ("Storage", record.storage),
        ] {
            if let Some(fact) = fact {
                details.push_str(&format!("\n{}: {}", label, fact));
            }
        }

        self.templates.render(
            TemplateKey::ProductDetail,
            &[
                ("name", record.name),
                ("origin", record.origin),
                ("season", record.season),
                ("specs", specs.as_str()),
                ("description", record.description),
                ("details", details.as_str()),
            ],
        )
    }
}

/// Button shown next to a reply that opens `action`
fn quick_action_for(action: UiAction) -> QuickActionId {
    match action {
        UiAction::OpenQuoteForm => QuickActionId::RequestQuote,
        UiAction::OpenContactForm => QuickActionId::ContactUs,
        UiAction::OpenAppointmentScheduler => QuickActionId::ScheduleCall,
        UiAction::OpenProductCatalog => QuickActionId::BrowseCatalog,
    }
}
