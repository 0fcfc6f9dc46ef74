//! UI actions
//!
//! The engine never touches the storefront directly. It asks an [`ActionSink`]
//! to make another surface visible.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surfaces outside the chat widget that a reply can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiAction {
    OpenQuoteForm,
    OpenContactForm,
    OpenAppointmentScheduler,
    OpenProductCatalog,
}

impl UiAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiAction::OpenQuoteForm => "open_quote_form",
            UiAction::OpenContactForm => "open_contact_form",
            UiAction::OpenAppointmentScheduler => "open_appointment_scheduler",
            UiAction::OpenProductCatalog => "open_product_catalog",
        }
    }
}

impl fmt::Display for UiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quick action shortcuts shown in the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickActionId {
    BrowseCatalog,
    RequestQuote,
    ScheduleCall,
    ContactUs,
}

impl QuickActionId {
    pub const ALL: [QuickActionId; 4] = [
        QuickActionId::BrowseCatalog,
        QuickActionId::RequestQuote,
        QuickActionId::ScheduleCall,
        QuickActionId::ContactUs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuickActionId::BrowseCatalog => "browse-catalog",
            QuickActionId::RequestQuote => "request-quote",
            QuickActionId::ScheduleCall => "schedule-call",
            QuickActionId::ContactUs => "contact-us",
        }
    }

    /// The surface this shortcut deep-links into
    pub fn action(&self) -> UiAction {
        match self {
            QuickActionId::BrowseCatalog => UiAction::OpenProductCatalog,
            QuickActionId::RequestQuote => UiAction::OpenQuoteForm,
            QuickActionId::ScheduleCall => UiAction::OpenAppointmentScheduler,
            QuickActionId::ContactUs => UiAction::OpenContactForm,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s.trim())
    }
}

impl fmt::Display for QuickActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver for UI actions
///
/// Implemented by whatever hosts the widget. Called from a tokio task, so it
/// must not block.
pub trait ActionSink: Send + Sync {
    fn open(&self, action: UiAction);
}

/// Sink that discards every action
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ActionSink for NoopSink {
    fn open(&self, _action: UiAction) {}
}
