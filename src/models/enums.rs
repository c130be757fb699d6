//! Shared scheduling enums (weekdays, appointment types, slot durations)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Weekday
// ---------------------------------------------------------------------------

/// Day of week, ordered Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Weekday {
    Mon = 0,
    Tue = 1,
    Wed = 2,
    Thu = 3,
    Fri = 4,
    Sat = 5,
    Sun = 6,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Short token used by the day picker (`Mon`)
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// Full English name expected by the backend (`Monday`)
    pub fn full_name(self) -> &'static str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(d: chrono::Weekday) -> Self {
        match d {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

impl FromStr for Weekday {
    type Err = String;

    /// Accepts the short token or the full name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|d| {
                d.short_name().eq_ignore_ascii_case(needle)
                    || d.full_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| format!("Unknown weekday: {}", s))
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

// ---------------------------------------------------------------------------
// AppointmentType
// ---------------------------------------------------------------------------

/// Admission mode of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppointmentType {
    /// Fixed-duration sub-slots
    #[default]
    #[serde(rename = "TIMESLOT")]
    Timeslot,
    /// Per-slot patient headcount, no fixed sub-division
    #[serde(rename = "SEQUENCE")]
    Sequence,
}

impl AppointmentType {
    pub fn as_wire(self) -> &'static str {
        match self {
            AppointmentType::Timeslot => "TIMESLOT",
            AppointmentType::Sequence => "SEQUENCE",
        }
    }
}

impl FromStr for AppointmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TIMESLOT" => Ok(AppointmentType::Timeslot),
            "SEQUENCE" => Ok(AppointmentType::Sequence),
            other => Err(format!("Unknown appointment type: {}", other)),
        }
    }
}

impl std::fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

// ---------------------------------------------------------------------------
// SlotDuration
// ---------------------------------------------------------------------------

/// Length of one bookable sub-slot in TIMESLOT mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum SlotDuration {
    Min5 = 5,
    Min10 = 10,
    Min15 = 15,
    Min20 = 20,
    Min30 = 30,
    Min40 = 40,
    Min45 = 45,
    Min60 = 60,
}

impl SlotDuration {
    pub const ALL: [SlotDuration; 8] = [
        SlotDuration::Min5,
        SlotDuration::Min10,
        SlotDuration::Min15,
        SlotDuration::Min20,
        SlotDuration::Min30,
        SlotDuration::Min40,
        SlotDuration::Min45,
        SlotDuration::Min60,
    ];

    pub fn minutes(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for SlotDuration {
    type Error = String;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        SlotDuration::ALL
            .into_iter()
            .find(|d| d.minutes() == v)
            .ok_or_else(|| format!("Unsupported slot duration: {} minutes", v))
    }
}

impl From<SlotDuration> for u32 {
    fn from(d: SlotDuration) -> Self {
        d.minutes()
    }
}

impl FromStr for SlotDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let minutes: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid slot duration: {}", s))?;
        SlotDuration::try_from(minutes)
    }
}

impl std::fmt::Display for SlotDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.minutes())
    }
}
