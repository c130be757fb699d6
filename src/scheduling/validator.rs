//! Slot validation: field completeness, ordering, overlap and
//! appointment-type rules

use crate::models::{AppointmentType, SlotDuration, TimeSlot};

pub const MSG_MISSING_FIELDS: &str = "All time fields must be filled.";
pub const MSG_OUT_OF_RANGE: &str = "Hours must be 0-23 and minutes 0-59.";
pub const MSG_TO_BEFORE_FROM: &str = "'To Time' must be after 'From Time'.";
pub const MSG_MISSING_DURATION: &str = "Please select a slot duration.";
pub const MSG_MISSING_PATIENT_COUNT: &str = "Please enter the number of patients for every slot.";

/// Two slot rows whose intervals intersect (1-based positions, `first < second`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotOverlap {
    pub first: usize,
    pub second: usize,
}

impl SlotOverlap {
    pub fn message(&self) -> String {
        format!(
            "Time slot {} overlaps with time slot {}.",
            self.first, self.second
        )
    }
}

/// Error state for one editor submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotValidation {
    /// One entry per slot row; empty string means the row is valid
    pub slot_errors: Vec<String>,
    pub overlap: Option<SlotOverlap>,
    pub appointment_error: Option<String>,
}

impl SlotValidation {
    pub fn is_valid(&self) -> bool {
        self.slot_errors.iter().all(String::is_empty)
            && self.overlap.is_none()
            && self.appointment_error.is_none()
    }

    /// The message surfaced when the confirm gate fails
    pub fn first_error(&self) -> Option<String> {
        if let Some((index, msg)) = self
            .slot_errors
            .iter()
            .enumerate()
            .find(|(_, msg)| !msg.is_empty())
        {
            return Some(format!("Slot {}: {}", index + 1, msg));
        }
        if let Some(overlap) = self.overlap {
            return Some(overlap.message());
        }
        self.appointment_error.clone()
    }
}

/// Validate a single row
pub fn validate_slot(slot: &TimeSlot) -> Option<&'static str> {
    let (Some(fh), Some(fm), Some(th), Some(tm)) =
        (slot.from_hour, slot.from_minute, slot.to_hour, slot.to_minute)
    else {
        return Some(MSG_MISSING_FIELDS);
    };

    if fh > 23 || th > 23 || fm > 59 || tm > 59 {
        return Some(MSG_OUT_OF_RANGE);
    }

    let from = fh as u32 * 60 + fm as u32;
    let to = th as u32 * 60 + tm as u32;
    if from >= to {
        return Some(MSG_TO_BEFORE_FROM);
    }

    None
}

/// First overlapping pair, scanning pairs in row order.
///
/// Only runs with two or more rows; rows that are incomplete never overlap.
pub fn find_overlap(slots: &[TimeSlot]) -> Option<SlotOverlap> {
    if slots.len() < 2 {
        return None;
    }

    for i in 0..slots.len() {
        for j in (i + 1)..slots.len() {
            if slots[i].overlaps(&slots[j]) {
                return Some(SlotOverlap {
                    first: i + 1,
                    second: j + 1,
                });
            }
        }
    }

    None
}

/// Appointment-type rule: TIMESLOT needs a duration, SEQUENCE needs a
/// positive patient count on every row
pub fn check_appointment_type(
    slots: &[TimeSlot],
    appointment_type: AppointmentType,
    slot_duration: Option<SlotDuration>,
) -> Option<String> {
    match appointment_type {
        AppointmentType::Timeslot if slot_duration.is_none() => {
            Some(MSG_MISSING_DURATION.to_string())
        }
        AppointmentType::Sequence
            if slots
                .iter()
                .any(|s| !matches!(s.patient_count, Some(n) if n > 0)) =>
        {
            Some(MSG_MISSING_PATIENT_COUNT.to_string())
        }
        _ => None,
    }
}

/// Run every rule over the editor rows
pub fn validate(
    slots: &[TimeSlot],
    appointment_type: AppointmentType,
    slot_duration: Option<SlotDuration>,
) -> SlotValidation {
    let slot_errors = slots
        .iter()
        .map(|slot| validate_slot(slot).unwrap_or_default().to_string())
        .collect();

    SlotValidation {
        slot_errors,
        overlap: find_overlap(slots),
        appointment_error: check_appointment_type(slots, appointment_type, slot_duration),
    }
}
