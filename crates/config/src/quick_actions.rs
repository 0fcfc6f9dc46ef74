//! Quick action shortcuts shown under the welcome message

use harvest_chat_core::{QuickActionId, UiAction};

/// A labeled deep link into another part of the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub id: QuickActionId,
    pub label: &'static str,
    pub action: UiAction,
    pub description: &'static str,
}

pub fn quick_action(id: QuickActionId) -> QuickAction {
    let (label, description) = match id {
        QuickActionId::BrowseCatalog => ("Browse products", "See our oils and fresh produce"),
        QuickActionId::RequestQuote => ("Request a quote", "Get pricing for your volumes"),
        QuickActionId::ScheduleCall => ("Schedule a call", "Book a consultation with our team"),
        QuickActionId::ContactUs => ("Contact us", "Send a message to our sales office"),
    };
    QuickAction {
        id,
        label,
        action: id.action(),
        description,
    }
}

/// All quick actions in display order
pub fn quick_actions() -> Vec<QuickAction> {
    QuickActionId::ALL.into_iter().map(quick_action).collect()
}
