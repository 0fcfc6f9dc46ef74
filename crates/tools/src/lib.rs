//! Storefront tools behind the chat's UI actions
//!
//! Currently the consultation scheduler opened by the appointment action.

pub mod appointment;

pub use appointment::{
    available_dates, time_slots, AppointmentBooker, AppointmentConfirmation, AppointmentError,
    AppointmentRequest, ConsultationTopic,
};
