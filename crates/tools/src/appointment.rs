//! Appointment Scheduler
//!
//! Backs the call-scheduling surface the consultation reply opens: bookable
//! dates, time slots, request validation and a simulated submission.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use harvest_chat_config::AppointmentConfig;
use harvest_chat_core::ProductId;
use serde::{Deserialize, Serialize};

/// What the visitor wants to discuss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationTopic {
    ProductInquiry,
    PricingAndVolumes,
    Logistics,
    QualityCertification,
    Partnership,
    Other,
}

impl ConsultationTopic {
    pub const ALL: [ConsultationTopic; 6] = [
        ConsultationTopic::ProductInquiry,
        ConsultationTopic::PricingAndVolumes,
        ConsultationTopic::Logistics,
        ConsultationTopic::QualityCertification,
        ConsultationTopic::Partnership,
        ConsultationTopic::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationTopic::ProductInquiry => "product_inquiry",
            ConsultationTopic::PricingAndVolumes => "pricing_and_volumes",
            ConsultationTopic::Logistics => "logistics",
            ConsultationTopic::QualityCertification => "quality_certification",
            ConsultationTopic::Partnership => "partnership",
            ConsultationTopic::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConsultationTopic::ProductInquiry => "Product inquiry",
            ConsultationTopic::PricingAndVolumes => "Pricing and volumes",
            ConsultationTopic::Logistics => "Logistics and shipping",
            ConsultationTopic::QualityCertification => "Quality and certification",
            ConsultationTopic::Partnership => "Partnership",
            ConsultationTopic::Other => "Other",
        }
    }
}

impl fmt::Display for ConsultationTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConsultationTopic {
    type Err = AppointmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| AppointmentError::UnknownTopic(s.to_string()))
    }
}

/// Validation and submission failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppointmentError {
    #[error("name is required")]
    MissingName,

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("{0} is outside the booking window")]
    DateOutOfRange(NaiveDate),

    #[error("{0} falls on a weekend")]
    Weekend(NaiveDate),

    #[error("{0} is not an available time slot")]
    UnavailableSlot(NaiveTime),

    #[error("unknown consultation topic: {0}")]
    UnknownTopic(String),
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Bookable dates, starting the day after `today`
pub fn available_dates(today: NaiveDate, config: &AppointmentConfig) -> Vec<NaiveDate> {
    today
        .iter_days()
        .skip(1)
        .take(config.horizon_days as usize)
        .filter(|d| !(config.skip_weekends && is_weekend(*d)))
        .collect()
}

/// Slot start times; every slot ends by the last hour
pub fn time_slots(config: &AppointmentConfig) -> Vec<NaiveTime> {
    let step = config.slot_minutes.max(1);
    let start = config.first_hour * 60;
    let end = config.last_hour.min(24) * 60;

    (start..end)
        .step_by(step as usize)
        .take_while(|minutes| minutes + step <= end)
        .filter_map(|minutes| NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0))
        .collect()
}

/// A consultation booking as entered in the scheduler form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub topic: ConsultationTopic,
    /// Products the visitor wants to talk about
    #[serde(default)]
    pub products: Vec<ProductId>,
    pub notes: Option<String>,
}

impl AppointmentRequest {
    /// Check the request against the booking window and slot grid
    pub fn validate(&self, today: NaiveDate, config: &AppointmentConfig) -> Result<(), AppointmentError> {
        if self.name.trim().is_empty() {
            return Err(AppointmentError::MissingName);
        }
        if !is_valid_email(&self.email) {
            return Err(AppointmentError::InvalidEmail(self.email.clone()));
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            if !is_valid_phone(phone) {
                return Err(AppointmentError::InvalidPhone(phone.to_string()));
            }
        }

        let last = today + chrono::Duration::days(i64::from(config.horizon_days));
        if self.date <= today || self.date > last {
            return Err(AppointmentError::DateOutOfRange(self.date));
        }
        if config.skip_weekends && is_weekend(self.date) {
            return Err(AppointmentError::Weekend(self.date));
        }
        if !time_slots(config).contains(&self.time) {
            return Err(AppointmentError::UnavailableSlot(self.time));
        }
        Ok(())
    }
}

fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn is_valid_phone(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    allowed && (8..=15).contains(&digits)
}

/// Result of a successful booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentConfirmation {
    /// Short reference quoted back to the visitor
    pub reference: String,
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub topic: ConsultationTopic,
    pub submitted_at: DateTime<Utc>,
    pub message: String,
}

/// Simulated booking backend
#[derive(Debug, Clone)]
pub struct AppointmentBooker {
    config: AppointmentConfig,
}

impl AppointmentBooker {
    pub fn new(config: AppointmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppointmentConfig {
        &self.config
    }

    pub fn available_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        available_dates(today, &self.config)
    }

    pub fn time_slots(&self) -> Vec<NaiveTime> {
        time_slots(&self.config)
    }

    /// Validate and "submit" a request
    ///
    /// There is no real backend; the submission waits the configured delay
    /// and logs the booking.
    pub async fn submit(
        &self,
        request: AppointmentRequest,
        today: NaiveDate,
    ) -> Result<AppointmentConfirmation, AppointmentError> {
        request.validate(today, &self.config)?;

        tokio::time::sleep(Duration::from_millis(self.config.submit_delay_ms)).await;

        let reference = format!(
            "APT{}",
            uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase()
        );

        tracing::info!(
            reference = %reference,
            date = %request.date,
            time = %request.time.format("%H:%M"),
            topic = request.topic.as_str(),
            products = ?request.products,
            "Consultation booked"
        );

        let message = format!(
            "Thank you, {}. Your consultation on {} at {} is booked (reference {}). \
             A confirmation will be sent to {}.",
            request.name.trim(),
            request.date.format("%A %-d %B %Y"),
            request.time.format("%H:%M"),
            reference,
            request.email.trim()
        );

        Ok(AppointmentConfirmation {
            reference,
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            date: request.date,
            time: request.time,
            topic: request.topic,
            submitted_at: Utc::now(),
            message,
        })
    }
}

impl Default for AppointmentBooker {
    fn default() -> Self {
        Self::new(AppointmentConfig::default())
    }
}
