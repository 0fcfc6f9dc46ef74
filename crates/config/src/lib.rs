//! Configuration and reference data for the storefront chat
//!
//! - [`settings`]: layered runtime settings (defaults, file, environment)
//! - [`catalog`]: read-only product table
//! - [`quick_actions`]: deep-link shortcuts
//! - [`templates`]: canned replies, overridable from YAML

pub mod catalog;
pub mod constants;
pub mod quick_actions;
pub mod settings;
pub mod templates;

pub use catalog::{catalog, Catalog, ProductRecord};
pub use quick_actions::{quick_action, quick_actions, QuickAction};
pub use settings::{ActionConfig, AppointmentConfig, ChatConfig, TypingConfig};
pub use templates::{substitute_variables, ResponseTemplates, TemplateKey};

/// Errors raised while loading settings or templates
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to load templates from {path}: {reason}")]
    Templates { path: String, reason: String },

    #[error("invalid settings: {0}")]
    Invalid(String),
}
