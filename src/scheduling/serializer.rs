//! Day-time wire format.
//!
//! A slot is `HH-MM-HH-MM`; slots within one day are joined by `~`; days are
//! joined by `,`. The backend parses positionally, so padding and separators
//! must be exact. Every selected day carries the same pattern.

use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::{AdjustmentSlot, TimeSlot, Weekday},
};

/// Sentinel sent when a temporary adjustment closes the whole day
pub const NOT_AVAILABLE: &str = "notavailable";

const SLOT_SEPARATOR: &str = "~";
const DAY_SEPARATOR: &str = ",";
const FIELD_SEPARATOR: &str = "-";

/// `HH-MM-HH-MM` for a complete row, `None` otherwise
pub fn slot_token(slot: &TimeSlot) -> Option<String> {
    Some(format!(
        "{:02}-{:02}-{:02}-{:02}",
        slot.from_hour?, slot.from_minute?, slot.to_hour?, slot.to_minute?
    ))
}

/// All rows of one day joined by `~`; incomplete rows are skipped
pub fn day_pattern(slots: &[TimeSlot]) -> String {
    slots
        .iter()
        .filter_map(slot_token)
        .collect::<Vec<_>>()
        .join(SLOT_SEPARATOR)
}

/// Broadcast the day pattern to every selected day.
///
/// Returns an empty string when no day is selected; callers must not submit
/// in that case.
pub fn serialize_day_time(selected_days: &[Weekday], slots: &[TimeSlot]) -> String {
    if selected_days.is_empty() {
        return String::new();
    }

    let pattern = day_pattern(slots);
    vec![pattern; selected_days.len()].join(DAY_SEPARATOR)
}

/// Day-time string for a single-date adjustment
pub fn serialize_adjustment(slots: &[AdjustmentSlot]) -> String {
    if !slots.is_empty() && slots.iter().all(|s| s.not_available) {
        return NOT_AVAILABLE.to_string();
    }

    let open: Vec<TimeSlot> = slots
        .iter()
        .filter(|s| !s.not_available)
        .map(|s| s.slot)
        .collect();
    day_pattern(&open)
}

/// `Mon,Wed` -> `Monday,Wednesday`
pub fn serialize_weekday_list(selected_days: &[Weekday]) -> String {
    selected_days
        .iter()
        .map(|d| d.full_name())
        .collect::<Vec<_>>()
        .join(DAY_SEPARATOR)
}

/// Inverse of [`serialize_weekday_list`]; accepts full or short names
pub fn parse_weekday_list(csv: &str) -> AppResult<BTreeSet<Weekday>> {
    csv.split(DAY_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<Weekday>().map_err(AppError::Validation))
        .collect()
}

/// Read the slot rows of the first day in a day-time string.
///
/// Days all share one pattern, so the first is representative. The
/// not-available sentinel and the empty string yield no rows.
pub fn parse_day_time(wire: &str) -> AppResult<Vec<TimeSlot>> {
    let wire = wire.trim();
    if wire.is_empty() || wire.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return Ok(Vec::new());
    }

    let first_day = wire.split(DAY_SEPARATOR).next().unwrap_or_default();
    first_day
        .split(SLOT_SEPARATOR)
        .filter(|token| !token.trim().is_empty())
        .map(parse_slot_token)
        .collect()
}

fn parse_slot_token(token: &str) -> AppResult<TimeSlot> {
    let fields = token
        .trim()
        .split(FIELD_SEPARATOR)
        .map(|f| f.parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| AppError::Validation(format!("Malformed time slot: {}", token)))?;

    match fields.as_slice() {
        [fh, fm, th, tm] => Ok(TimeSlot::new(*fh, *fm, *th, *tm)),
        _ => Err(AppError::Validation(format!(
            "Malformed time slot: {}",
            token
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_days_one_slot() {
        let out = serialize_day_time(&[Weekday::Mon, Weekday::Tue], &[TimeSlot::new(9, 0, 10, 0)]);
        assert_eq!(out, "09-00-10-00,09-00-10-00");
    }

    #[test]
    fn test_two_slots_per_day() {
        let slots = [TimeSlot::new(8, 5, 12, 0), TimeSlot::new(14, 30, 18, 45)];
        let out = serialize_day_time(&[Weekday::Sat], &slots);
        assert_eq!(out, "08-05-12-00~14-30-18-45");
    }

    #[test]
    fn test_no_days_is_empty() {
        assert_eq!(serialize_day_time(&[], &[TimeSlot::new(9, 0, 10, 0)]), "");
    }

    #[test]
    fn test_adjustment_sentinel() {
        let slots = [
            AdjustmentSlot {
                slot: TimeSlot::new(9, 0, 10, 0),
                not_available: true,
            },
            AdjustmentSlot::unavailable(),
        ];
        assert_eq!(serialize_adjustment(&slots), NOT_AVAILABLE);
    }

    #[test]
    fn test_adjustment_skips_flagged_rows() {
        let slots = [
            AdjustmentSlot::available(TimeSlot::new(9, 0, 10, 0)),
            AdjustmentSlot::unavailable(),
        ];
        assert_eq!(serialize_adjustment(&slots), "09-00-10-00");
    }

    #[test]
    fn test_weekday_list() {
        let days = [Weekday::Mon, Weekday::Wed, Weekday::Fri];
        assert_eq!(serialize_weekday_list(&days), "Monday,Wednesday,Friday");

        let parsed = parse_weekday_list("Monday, Wednesday,Friday").unwrap();
        assert_eq!(parsed.into_iter().collect::<Vec<_>>(), days.to_vec());
        assert!(parse_weekday_list("Monday,Someday").is_err());
        assert!(parse_weekday_list("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_day_time_reads_first_day() {
        let slots = parse_day_time("09-00-12-00~14-00-17-30,09-00-12-00~14-00-17-30").unwrap();
        assert_eq!(
            slots,
            vec![TimeSlot::new(9, 0, 12, 0), TimeSlot::new(14, 0, 17, 30)]
        );
        assert!(parse_day_time(NOT_AVAILABLE).unwrap().is_empty());
        assert!(parse_day_time("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_day_time_rejects_malformed() {
        assert!(parse_day_time("09-00-12").is_err());
        assert!(parse_day_time("aa-00-12-00").is_err());
    }
}
