//! Layered chat settings
//!
//! Built-in defaults, then an optional YAML/TOML file, then `HARVEST_CHAT__*`
//! environment variables (`HARVEST_CHAT__TYPING__MAX_MS=1500`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;
use crate::ConfigError;

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Name used in greetings and templates
    pub company_name: String,
    pub typing: TypingConfig,
    pub actions: ActionConfig,
    pub appointments: AppointmentConfig,
    /// Optional YAML file overriding response templates
    pub templates_path: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            company_name: constants::company::NAME.to_string(),
            typing: TypingConfig::default(),
            actions: ActionConfig::default(),
            appointments: AppointmentConfig::default(),
            templates_path: None,
        }
    }
}

/// Typing simulation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub base_ms: u64,
    pub per_char_ms: u64,
    pub max_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            base_ms: constants::typing::BASE_MS,
            per_char_ms: constants::typing::PER_CHAR_MS,
            max_ms: constants::typing::MAX_MS,
        }
    }
}

impl TypingConfig {
    /// `min(base + per_char * chars, max)`
    pub fn delay_for(&self, reply: &str) -> Duration {
        let chars = reply.chars().count() as u64;
        let ms = self
            .base_ms
            .saturating_add(self.per_char_ms.saturating_mul(chars))
            .min(self.max_ms);
        Duration::from_millis(ms)
    }
}

/// Delayed UI actions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    pub delay_ms: u64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            delay_ms: constants::actions::DELAY_MS,
        }
    }
}

impl ActionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Appointment scheduler
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentConfig {
    pub horizon_days: u32,
    pub first_hour: u32,
    pub last_hour: u32,
    pub slot_minutes: u32,
    pub skip_weekends: bool,
    pub submit_delay_ms: u64,
}

impl Default for AppointmentConfig {
    fn default() -> Self {
        Self {
            horizon_days: constants::appointments::HORIZON_DAYS,
            first_hour: constants::appointments::FIRST_HOUR,
            last_hour: constants::appointments::LAST_HOUR,
            slot_minutes: constants::appointments::SLOT_MINUTES,
            skip_weekends: true,
            submit_delay_ms: constants::appointments::SUBMIT_DELAY_MS,
        }
    }
}

impl ChatConfig {
    /// Load settings, optionally from a file
    ///
    /// A path that was asked for must exist; without one only defaults and
    /// environment overrides apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(constants::ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings: ChatConfig = builder.build()?.try_deserialize()?;
        settings.validate()?;

        tracing::debug!(
            company = %settings.company_name,
            file = ?path,
            "Loaded chat settings"
        );

        Ok(settings)
    }

    /// Reject settings the scheduler and typing simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.company_name.trim().is_empty() {
            return Err(ConfigError::Invalid("company_name must not be empty".into()));
        }
        if self.typing.max_ms < self.typing.base_ms {
            return Err(ConfigError::Invalid(format!(
                "typing.max_ms ({}) is below typing.base_ms ({})",
                self.typing.max_ms, self.typing.base_ms
            )));
        }
        let appt = &self.appointments;
        if appt.slot_minutes == 0 {
            return Err(ConfigError::Invalid("appointments.slot_minutes must be positive".into()));
        }
        if appt.first_hour >= appt.last_hour || appt.last_hour > 24 {
            return Err(ConfigError::Invalid(format!(
                "appointments hours {}..{} are not a valid window",
                appt.first_hour, appt.last_hour
            )));
        }
        if appt.horizon_days == 0 {
            return Err(ConfigError::Invalid("appointments.horizon_days must be positive".into()));
        }
        Ok(())
    }
}
