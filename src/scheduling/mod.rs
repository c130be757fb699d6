//! Pure slot-scheduling logic: weekday range filter, slot validation and
//! the day-time wire format

pub mod dates;
pub mod serializer;
pub mod validator;

pub use dates::{available_days, format_wire_date, is_day_in_range, parse_calendar_date};
pub use serializer::{
    parse_day_time, parse_weekday_list, serialize_adjustment, serialize_day_time,
    serialize_weekday_list, NOT_AVAILABLE,
};
pub use validator::{validate, SlotOverlap, SlotValidation};
