//! Schedule models (date ranges, time slots, weekly schedules, adjustments)

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::enums::{AppointmentType, SlotDuration, Weekday};

/// Hard cap on slot rows per schedule (morning/afternoon)
pub const MAX_SLOTS: usize = 2;

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// Credentials and tenancy passed explicitly to every remote call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub username: String,
    pub credential_token: String,
    pub org_id: String,
    pub facility_id: String,
}

// ---------------------------------------------------------------------------
// DateRange
// ---------------------------------------------------------------------------

/// Start/end calendar days of a weekly schedule. Either bound may be unset
/// while the user is still editing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both bounds set
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Both bounds set and end before start
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if e < s)
    }

    /// Inclusive membership; false unless the range is complete and ordered
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(s), Some(e)) if s <= e => s <= date && date <= e,
            _ => false,
        }
    }

    /// Number of calendar days covered, inclusive
    pub fn len_days(&self) -> Option<u64> {
        match (self.start, self.end) {
            (Some(s), Some(e)) if s <= e => Some((e - s).num_days() as u64 + 1),
            _ => None,
        }
    }

    /// Iterate every calendar day of a complete, ordered range
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let (start, count) = match (self.start, self.len_days()) {
            (Some(s), Some(n)) => (s, n),
            _ => (NaiveDate::MIN, 0),
        };
        (0..count).filter_map(move |offset| start.checked_add_days(Days::new(offset)))
    }
}

// ---------------------------------------------------------------------------
// TimeSlot
// ---------------------------------------------------------------------------

/// One from/to row of the slot editor.
///
/// Fields are optional because the editor holds partially filled rows;
/// the validator decides whether a row is usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub from_hour: Option<u8>,
    pub from_minute: Option<u8>,
    pub to_hour: Option<u8>,
    pub to_minute: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_count: Option<u32>,
}

impl TimeSlot {
    /// A fully filled row
    pub fn new(from_hour: u8, from_minute: u8, to_hour: u8, to_minute: u8) -> Self {
        Self {
            from_hour: Some(from_hour),
            from_minute: Some(from_minute),
            to_hour: Some(to_hour),
            to_minute: Some(to_minute),
            patient_count: None,
        }
    }

    pub fn with_patient_count(mut self, count: u32) -> Self {
        self.patient_count = Some(count);
        self
    }

    pub fn is_complete(&self) -> bool {
        self.from_hour.is_some()
            && self.from_minute.is_some()
            && self.to_hour.is_some()
            && self.to_minute.is_some()
    }

    /// Start as minutes since midnight
    pub fn start_minutes(&self) -> Option<u32> {
        Some(self.from_hour? as u32 * 60 + self.from_minute? as u32)
    }

    /// End as minutes since midnight
    pub fn end_minutes(&self) -> Option<u32> {
        Some(self.to_hour? as u32 * 60 + self.to_minute? as u32)
    }

    /// Half-open interval overlap; touching slots do not overlap
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        match (
            self.start_minutes(),
            self.end_minutes(),
            other.start_minutes(),
            other.end_minutes(),
        ) {
            (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) => {
                a_start < b_end && a_end > b_start
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// WeeklySchedule
// ---------------------------------------------------------------------------

/// A recurring pattern of slots applied to selected weekdays across a range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub date_range: DateRange,
    pub selected_days: BTreeSet<Weekday>,
    pub slots: Vec<TimeSlot>,
    pub appointment_type: AppointmentType,
    pub slot_duration: Option<SlotDuration>,
}

impl WeeklySchedule {
    /// Selected days in Monday-first order
    pub fn days(&self) -> Vec<Weekday> {
        self.selected_days.iter().copied().collect()
    }

    /// Append an empty row; a no-op once the cap is reached
    pub fn add_slot(&mut self) -> bool {
        if self.slots.len() >= MAX_SLOTS {
            return false;
        }
        self.slots.push(TimeSlot::default());
        true
    }

    /// Remove a row; the last remaining row is never removed
    pub fn remove_slot(&mut self, index: usize) -> bool {
        if self.slots.len() <= 1 || index >= self.slots.len() {
            return false;
        }
        self.slots.remove(index);
        true
    }
}

// ---------------------------------------------------------------------------
// TemporaryAdjustment
// ---------------------------------------------------------------------------

/// A slot row in the temporary-adjustment editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentSlot {
    #[serde(flatten)]
    pub slot: TimeSlot,
    #[serde(default)]
    pub not_available: bool,
}

impl AdjustmentSlot {
    pub fn available(slot: TimeSlot) -> Self {
        Self {
            slot,
            not_available: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            slot: TimeSlot::default(),
            not_available: true,
        }
    }
}

/// One-off override of the weekly schedule for a single date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryAdjustment {
    pub date: NaiveDate,
    pub slots: Vec<AdjustmentSlot>,
    pub slot_duration: Option<SlotDuration>,
}

impl TemporaryAdjustment {
    /// Whole day closed: at least one row and every row flagged
    pub fn is_not_available(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(|s| s.not_available)
    }

    /// Rows that still describe open time
    pub fn open_slots(&self) -> Vec<TimeSlot> {
        self.slots
            .iter()
            .filter(|s| !s.not_available)
            .map(|s| s.slot)
            .collect()
    }
}
