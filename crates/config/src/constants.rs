//! Centralized constants for the chat widget
//!
//! Single source of truth for timing and scheduling defaults. Settings
//! structs read their defaults from here so the numbers live in one place.

/// Simulated "typing" delay before a bot reply appears
///
/// The delay grows with the reply length and is capped, so long replies do
/// not keep the visitor waiting.
pub mod typing {
    /// Fixed part of the delay (ms)
    pub const BASE_MS: u64 = 800;

    /// Added per character of reply text (ms)
    pub const PER_CHAR_MS: u64 = 8;

    /// Upper bound (ms)
    pub const MAX_MS: u64 = 2500;
}

/// Delayed UI actions (opening the quote form and friends)
pub mod actions {
    /// Delay between composing a reply and opening the linked surface (ms)
    pub const DELAY_MS: u64 = 2000;
}

/// Appointment scheduler defaults
pub mod appointments {
    /// How many calendar days ahead a call can be booked
    pub const HORIZON_DAYS: u32 = 14;

    /// First bookable hour (24h clock)
    pub const FIRST_HOUR: u32 = 9;

    /// Hour at which the last slot must have ended (24h clock)
    pub const LAST_HOUR: u32 = 17;

    /// Slot length (minutes)
    pub const SLOT_MINUTES: u32 = 30;

    /// Simulated submission latency (ms)
    pub const SUBMIT_DELAY_MS: u64 = 1500;
}

/// Storefront identity
pub mod company {
    pub const NAME: &str = "Harvest Link Trading";

    pub const EMAIL: &str = "sales@harvestlink-trading.com";

    pub const PHONE: &str = "+216 74 000 000";

    pub const ADDRESS: &str = "Route de Tunis km 4, 3000 Sfax, Tunisia";

    pub const HOURS: &str = "Monday - Friday, 8:00 - 17:00 (CET)";
}

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "HARVEST_CHAT";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_bounds() {
        assert!(typing::BASE_MS < typing::MAX_MS);
        assert!(typing::PER_CHAR_MS > 0);
    }

    #[test]
    fn test_appointment_window() {
        assert!(appointments::FIRST_HOUR < appointments::LAST_HOUR);
        assert!(appointments::LAST_HOUR <= 24);
        assert_eq!(60 % appointments::SLOT_MINUTES, 0);
    }
}
