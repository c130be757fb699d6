//! Data models for the clinic scheduler

pub mod enums;
pub mod schedule;
pub mod wire;

// Re-export commonly used types
pub use enums::{AppointmentType, SlotDuration, Weekday};
pub use schedule::{
    AdjustmentSlot, DateRange, SessionContext, TemporaryAdjustment, TimeSlot, WeeklySchedule,
    MAX_SLOTS,
};
pub use wire::{
    AuthFields, AvailabilityCheckRequest, ExistingSchedule, SlotDatesRequest, SlotDatesResponse,
    SlotRequest, StatusResponse, SuccessStatus, TemporaryAdjustRequest,
};
