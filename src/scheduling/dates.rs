//! Calendar-date parsing and the weekday range filter

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

use crate::models::{DateRange, Weekday};

/// Wire format for every date sent to the backend
pub const WIRE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Dialog formats, tried first and in order
const PRIMARY_DATE_FORMATS: &[&str] = &["%d.%m.%y", WIRE_DATE_FORMAT, "%d/%m/%y"];

/// Formats tried after the primary ones
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%d-%m-%y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%a %b %d %Y",
];

const FALLBACK_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Four-digit year formats also accept `25` as the year 0025; such dates
/// are never meant and are discarded so a two-digit form can match.
const MIN_YEAR: i32 = 1900;

/// Parse a date typed or picked in the calendar dialog.
///
/// Tries `DD.MM.YY`, then `DD/MM/YYYY` and `DD/MM/YY`, then a set of common
/// generic forms (ISO dates, RFC 3339 timestamps, month names). Time of day
/// is dropped and years before 1900 are rejected.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let plausible = |date: &NaiveDate| date.year() >= MIN_YEAR;

    PRIMARY_DATE_FORMATS
        .iter()
        .chain(FALLBACK_DATE_FORMATS)
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok().filter(plausible))
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
                .filter(plausible)
        })
        .or_else(|| {
            FALLBACK_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
                .filter(plausible)
        })
}

/// Render a date as `DD/MM/YYYY`
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// Build a range from two text inputs; unparseable bounds stay unset
pub fn parse_date_range(start: &str, end: &str) -> DateRange {
    DateRange {
        start: parse_calendar_date(start),
        end: parse_calendar_date(end),
    }
}

/// Weekdays that occur at least once in the range.
///
/// Fails open: an incomplete or inverted range restricts nothing and
/// yields all seven days.
pub fn available_days(range: &DateRange) -> BTreeSet<Weekday> {
    if !range.is_complete() || range.is_inverted() {
        return Weekday::ALL.into_iter().collect();
    }

    // A week or more covers every weekday
    range
        .iter_days()
        .take(7)
        .map(|date| Weekday::from(date.weekday()))
        .collect()
}

/// Whether `day` may be selected for a range given as text inputs
pub fn is_day_in_range(day: Weekday, start: &str, end: &str) -> bool {
    available_days(&parse_date_range(start, end)).contains(&day)
}
