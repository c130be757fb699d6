//! Clinic appointment calendar scheduling
//!
//! Weekly slot schedules and single-date temporary adjustments for a clinic
//! facility: weekday availability over a date range, slot validation, the
//! backend's day-time wire format, and the dialog workflows that submit
//! schedules to the remote scheduling service.

pub mod config;
pub mod error;
pub mod models;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::Services;
