//! Weekly schedule dialog workflow.
//!
//! State machine:
//!
//! ```text
//! Idle ──toggle day──▶ DaysSelected ──open editor──▶ SlotsConfigured
//!  ▲                        │                            │ confirm (validated)
//!  └──── selection empty ───┴────────────────────────────┤
//!                                                        ▼
//!                 SlotsConfigured ◀── refused ── AvailabilityChecking
//!                                                        │ available
//!                                                        ▼
//!                         Failed ◀── error ──────── Submitting ──▶ Success
//! ```
//!
//! Remote calls happen only from `AvailabilityChecking` and `Submitting`;
//! a second confirm while either is active is rejected as [`AppError::Busy`].

use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        AppointmentType, AuthFields, AvailabilityCheckRequest, DateRange, ExistingSchedule,
        SessionContext, SlotDuration, SlotRequest, StatusResponse, SuccessStatus, TimeSlot,
        Weekday, WeeklySchedule,
    },
    scheduling::{
        dates::{available_days, format_wire_date, parse_date_range},
        serializer::{parse_day_time, parse_weekday_list, serialize_day_time, serialize_weekday_list},
        validator::{self, SlotValidation},
    },
};

use super::{backend::SchedulingBackend, CloseHandle, DialogLifetime};

pub const MSG_NO_DAYS: &str = "Please select at least one day.";
pub const MSG_NO_DATES: &str = "Please select both a start date and an end date.";
pub const MSG_INVERTED_RANGE: &str = "'End Date' must be on or after 'Start Date'.";
pub const MSG_DIALOG_CLOSED: &str = "This dialog has been closed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    DaysSelected,
    SlotsConfigured,
    AvailabilityChecking,
    Submitting,
    Success,
    Failed,
}

impl WorkflowState {
    /// A remote call is in flight
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            WorkflowState::AvailabilityChecking | WorkflowState::Submitting
        )
    }

    /// The slot editor is open and editable
    pub fn is_editing_slots(self) -> bool {
        matches!(self, WorkflowState::SlotsConfigured | WorkflowState::Failed)
    }

    fn can_transition_to(self, next: WorkflowState) -> bool {
        use WorkflowState::*;
        matches!(
            (self, next),
            (Idle, DaysSelected)
                | (DaysSelected, Idle)
                | (DaysSelected, SlotsConfigured)
                | (SlotsConfigured, Idle)
                | (SlotsConfigured, AvailabilityChecking)
                | (AvailabilityChecking, SlotsConfigured)
                | (AvailabilityChecking, Submitting)
                | (Submitting, Success)
                | (Submitting, Failed)
                | (Failed, Idle)
                | (Failed, SlotsConfigured)
                | (Failed, AvailabilityChecking)
        )
    }
}

/// Owns one `WeeklySchedule` for the lifetime of its dialog
pub struct WeeklyScheduleWorkflow {
    session: SessionContext,
    schedule: WeeklySchedule,
    slot_id: Option<String>,
    state: WorkflowState,
    lifetime: DialogLifetime,
    /// Stored days dropped on load because the range no longer contains them
    discarded_days: Vec<Weekday>,
}

/// Error raised for a weekday the selected date range does not contain
pub fn day_outside_range(day: Weekday) -> AppError {
    AppError::DayUnavailable(format!(
        "{} does not fall within the selected date range.",
        day.full_name()
    ))
}

impl WeeklyScheduleWorkflow {
    /// Workflow for creating a new schedule
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            schedule: WeeklySchedule::default(),
            slot_id: None,
            state: WorkflowState::Idle,
            lifetime: DialogLifetime::new(),
            discarded_days: Vec::new(),
        }
    }

    /// Workflow for editing a schedule the backend already holds
    pub fn edit(session: SessionContext, existing: &ExistingSchedule) -> AppResult<Self> {
        let date_range = parse_date_range(&existing.start_date, &existing.stop_date);
        let allowed = available_days(&date_range);
        let (selected_days, discarded): (BTreeSet<Weekday>, BTreeSet<Weekday>) =
            parse_weekday_list(&existing.checked_day)?
                .into_iter()
                .partition(|d| allowed.contains(d));
        for day in &discarded {
            tracing::warn!(
                "Schedule {}: {} is not within the stored date range",
                existing.slot_id,
                day.full_name()
            );
        }

        let mut slots = parse_day_time(&existing.day_time)?;
        if slots.is_empty() {
            slots.push(TimeSlot::default());
        }
        slots.truncate(crate::models::MAX_SLOTS);

        let state = if selected_days.is_empty() {
            WorkflowState::Idle
        } else {
            WorkflowState::SlotsConfigured
        };

        tracing::info!(
            "Editing schedule {} ({} days, {} slots)",
            existing.slot_id,
            selected_days.len(),
            slots.len()
        );

        Ok(Self {
            session,
            schedule: WeeklySchedule {
                date_range,
                selected_days,
                slots,
                appointment_type: existing.book_app_type,
                slot_duration: existing.slot_duration,
            },
            slot_id: Some(existing.slot_id.clone()),
            state,
            lifetime: DialogLifetime::new(),
            discarded_days: discarded.into_iter().collect(),
        })
    }

    // ---- Accessors ----

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn slot_id(&self) -> Option<&str> {
        self.slot_id.as_deref()
    }

    /// Stored days that [`Self::edit`] dropped because the range excludes them
    pub fn discarded_days(&self) -> &[Weekday] {
        &self.discarded_days
    }

    pub fn is_edit_mode(&self) -> bool {
        self.slot_id.is_some()
    }

    /// The confirm action is disabled while this is true
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn close_handle(&self) -> CloseHandle {
        self.lifetime.handle()
    }

    /// Days the picker may enable for the current range
    pub fn available_days(&self) -> BTreeSet<Weekday> {
        available_days(&self.schedule.date_range)
    }

    // ---- Transitions ----

    fn transition(&mut self, next: WorkflowState) -> AppResult<()> {
        if self.state == next {
            return Ok(());
        }
        if !self.state.can_transition_to(next) {
            return Err(AppError::InvalidState(format!(
                "Cannot move from {:?} to {:?}",
                self.state, next
            )));
        }
        tracing::info!("Weekly schedule: {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }

    fn ensure_editable(&self) -> AppResult<()> {
        if self.lifetime.is_closed() {
            return Err(AppError::InvalidState(MSG_DIALOG_CLOSED.to_string()));
        }
        if self.state.is_busy() {
            return Err(AppError::Busy);
        }
        if self.state == WorkflowState::Success {
            return Err(AppError::InvalidState(
                "Schedule already submitted".to_string(),
            ));
        }
        Ok(())
    }

    /// Fall back to `Idle` when the selection empties, or leave `Idle` when
    /// it fills
    fn sync_selection_state(&mut self) -> AppResult<()> {
        if self.schedule.selected_days.is_empty() {
            if self.state != WorkflowState::Idle {
                self.transition(WorkflowState::Idle)?;
            }
        } else if self.state == WorkflowState::Idle {
            self.transition(WorkflowState::DaysSelected)?;
        }
        Ok(())
    }

    fn leave_failed(&mut self) -> AppResult<()> {
        if self.state == WorkflowState::Failed {
            self.transition(WorkflowState::SlotsConfigured)?;
        }
        Ok(())
    }

    // ---- Date range & days ----

    /// Set or correct the date range.
    ///
    /// An inverted range is rejected and leaves the schedule untouched.
    /// Selected days that no longer occur in the range are dropped and
    /// returned.
    pub fn set_date_range(&mut self, start: &str, end: &str) -> AppResult<Vec<Weekday>> {
        self.ensure_editable()?;

        let range = parse_date_range(start, end);
        if range.is_inverted() {
            tracing::warn!("Rejected inverted date range {} - {}", start, end);
            return Err(AppError::Validation(MSG_INVERTED_RANGE.to_string()));
        }
        self.apply_date_range(range)
    }

    fn apply_date_range(&mut self, range: DateRange) -> AppResult<Vec<Weekday>> {
        self.schedule.date_range = range;

        let allowed = available_days(&range);
        let dropped: Vec<Weekday> = self
            .schedule
            .selected_days
            .iter()
            .filter(|d| !allowed.contains(d))
            .copied()
            .collect();

        if !dropped.is_empty() {
            tracing::warn!("Dropping days outside the new range: {:?}", dropped);
            self.schedule.selected_days.retain(|d| allowed.contains(d));
        }

        self.sync_selection_state()?;
        Ok(dropped)
    }

    /// Toggle a weekday; returns whether it is now selected.
    ///
    /// Selecting a day that does not occur in the range is refused with a
    /// warning; the existing selection is kept.
    pub fn toggle_day(&mut self, day: Weekday) -> AppResult<bool> {
        self.ensure_editable()?;

        if self.schedule.selected_days.remove(&day) {
            self.sync_selection_state()?;
            return Ok(false);
        }

        if !self.available_days().contains(&day) {
            tracing::warn!("{} is not within the selected date range", day.full_name());
            return Err(day_outside_range(day));
        }

        self.schedule.selected_days.insert(day);
        self.sync_selection_state()?;
        Ok(true)
    }

    // ---- Slot editor ----

    /// Open the slot editor, seeding one empty row
    pub fn open_slot_editor(&mut self) -> AppResult<()> {
        self.ensure_editable()?;

        if self.state.is_editing_slots() {
            return Ok(());
        }
        if self.schedule.selected_days.is_empty() {
            return Err(AppError::Validation(MSG_NO_DAYS.to_string()));
        }
        if self.schedule.slots.is_empty() {
            self.schedule.slots.push(TimeSlot::default());
        }
        self.transition(WorkflowState::SlotsConfigured)
    }

    fn ensure_slot_editor(&self) -> AppResult<()> {
        self.ensure_editable()?;
        if !self.state.is_editing_slots() {
            return Err(AppError::InvalidState(
                "Slot editor is not open".to_string(),
            ));
        }
        Ok(())
    }

    /// Add an empty row; returns false (no-op) at the two-row cap
    pub fn add_slot(&mut self) -> AppResult<bool> {
        self.ensure_slot_editor()?;
        let added = self.schedule.add_slot();
        if !added {
            tracing::warn!("Slot cap reached, ignoring add");
        }
        Ok(added)
    }

    /// Remove a row; the last row is kept
    pub fn remove_slot(&mut self, index: usize) -> AppResult<bool> {
        self.ensure_slot_editor()?;
        let removed = self.schedule.remove_slot(index);
        if removed {
            self.leave_failed()?;
        }
        Ok(removed)
    }

    pub fn update_slot(&mut self, index: usize, slot: TimeSlot) -> AppResult<()> {
        self.ensure_slot_editor()?;
        let row = self
            .schedule
            .slots
            .get_mut(index)
            .ok_or_else(|| AppError::Validation(format!("No slot row {}", index + 1)))?;
        *row = slot;
        self.leave_failed()
    }

    pub fn set_appointment_type(&mut self, appointment_type: AppointmentType) -> AppResult<()> {
        self.ensure_editable()?;
        self.schedule.appointment_type = appointment_type;
        self.leave_failed()
    }

    pub fn set_slot_duration(&mut self, duration: Option<SlotDuration>) -> AppResult<()> {
        self.ensure_editable()?;
        self.schedule.slot_duration = duration;
        self.leave_failed()
    }

    /// Current error state of the slot editor
    pub fn validate(&self) -> SlotValidation {
        validator::validate(
            &self.schedule.slots,
            self.schedule.appointment_type,
            self.schedule.slot_duration,
        )
    }

    // ---- Confirmation ----

    /// Gate the confirm action and enter `AvailabilityChecking`.
    ///
    /// On failure the state is unchanged and the first problem is returned.
    pub fn begin_confirm(&mut self) -> AppResult<AvailabilityCheckRequest> {
        self.ensure_editable()?;
        if !self.state.is_editing_slots() {
            return Err(AppError::InvalidState(format!(
                "Cannot confirm from {:?}",
                self.state
            )));
        }

        let range = self.schedule.date_range;
        let (Some(start), Some(end)) = (range.start, range.end) else {
            return Err(AppError::Validation(MSG_NO_DATES.to_string()));
        };
        if range.is_inverted() {
            return Err(AppError::Validation(MSG_INVERTED_RANGE.to_string()));
        }
        if self.schedule.selected_days.is_empty() {
            return Err(AppError::Validation(MSG_NO_DAYS.to_string()));
        }

        let validation = self.validate();
        if let Some(message) = validation.first_error() {
            tracing::warn!("Slot validation failed: {}", message);
            return Err(AppError::Validation(message));
        }

        self.transition(WorkflowState::AvailabilityChecking)?;

        Ok(AvailabilityCheckRequest {
            auth: AuthFields::from(&self.session),
            facility_id: self.session.facility_id.clone(),
            start_date: format_wire_date(start),
            stop_date: format_wire_date(end),
        })
    }

    /// Apply the availability answer; on success returns the create/edit
    /// payload and enters `Submitting`
    pub fn on_availability(
        &mut self,
        result: AppResult<StatusResponse>,
    ) -> AppResult<SlotRequest> {
        if self.state != WorkflowState::AvailabilityChecking {
            return Err(AppError::InvalidState(format!(
                "No availability check in flight ({:?})",
                self.state
            )));
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Availability check failed: {}", e);
                self.transition(WorkflowState::SlotsConfigured)?;
                return Err(e);
            }
        };

        if !response.is_success(SuccessStatus::Success) {
            tracing::warn!("Days not available: {:?}", response.message);
            self.transition(WorkflowState::SlotsConfigured)?;
            return Err(AppError::backend(response.message.as_deref()));
        }

        let request = self.slot_request()?;
        self.transition(WorkflowState::Submitting)?;
        Ok(request)
    }

    /// Apply the create/edit answer
    pub fn on_submitted(&mut self, result: AppResult<StatusResponse>) -> AppResult<()> {
        if self.state != WorkflowState::Submitting {
            return Err(AppError::InvalidState(format!(
                "No submission in flight ({:?})",
                self.state
            )));
        }

        let expected = if self.is_edit_mode() {
            SuccessStatus::True
        } else {
            SuccessStatus::Success
        };

        match result {
            Ok(response) if response.is_success(expected) => {
                tracing::info!(
                    "Weekly schedule {}",
                    if self.is_edit_mode() { "updated" } else { "created" }
                );
                self.transition(WorkflowState::Success)
            }
            Ok(response) => {
                tracing::warn!("Schedule submission refused: {:?}", response.message);
                self.transition(WorkflowState::Failed)?;
                Err(AppError::backend(response.message.as_deref()))
            }
            Err(e) => {
                tracing::error!("Schedule submission failed: {}", e);
                self.transition(WorkflowState::Failed)?;
                Err(e)
            }
        }
    }

    /// Run the whole confirm sequence against the backend.
    ///
    /// Returns `Ok` once the schedule is stored (`Success`: the host closes
    /// the dialog and refreshes). Closing the dialog mid-flight yields
    /// [`AppError::Cancelled`] and leaves the state as it was.
    pub async fn confirm(&mut self, backend: &dyn SchedulingBackend) -> AppResult<()> {
        let check = self.begin_confirm()?;
        tracing::debug!("Checking availability {} - {}", check.start_date, check.stop_date);

        let availability = self
            .guarded(backend.check_day_availability(&check))
            .await?;
        let request = self.on_availability(availability)?;
        tracing::debug!("Submitting day time {}", request.day_time);

        let submitted = if request.slot_id.is_some() {
            self.guarded(backend.edit_slot(&request)).await?
        } else {
            self.guarded(backend.add_slot(&request)).await?
        };
        self.on_submitted(submitted)
    }

    /// Wrap a call so that only cancellation escapes as an outer error; the
    /// inner result is fed to the state machine
    async fn guarded<F>(&self, call: F) -> AppResult<AppResult<StatusResponse>>
    where
        F: std::future::Future<Output = AppResult<StatusResponse>>,
    {
        match self.lifetime.guard(call).await {
            Err(AppError::Cancelled) => Err(AppError::Cancelled),
            other => Ok(other),
        }
    }

    /// Create/edit payload for the current schedule
    pub fn slot_request(&self) -> AppResult<SlotRequest> {
        let range = self.schedule.date_range;
        let (Some(start), Some(end)) = (range.start, range.end) else {
            return Err(AppError::Validation(MSG_NO_DATES.to_string()));
        };

        let days = self.schedule.days();
        if days.is_empty() {
            return Err(AppError::Validation(MSG_NO_DAYS.to_string()));
        }

        let patient_count = match self.schedule.appointment_type {
            AppointmentType::Sequence => Some(
                self.schedule
                    .slots
                    .iter()
                    .map(|s| s.patient_count.unwrap_or_default().to_string())
                    .collect::<Vec<_>>()
                    .join("~"),
            ),
            AppointmentType::Timeslot => None,
        };

        Ok(SlotRequest {
            auth: AuthFields::from(&self.session),
            facility_id: self.session.facility_id.clone(),
            book_app_type: self.schedule.appointment_type,
            checked_day: serialize_weekday_list(&days),
            day_time: serialize_day_time(&days, &self.schedule.slots),
            start_date: format_wire_date(start),
            stop_date: format_wire_date(end),
            slot_duration: match self.schedule.appointment_type {
                AppointmentType::Timeslot => self.schedule.slot_duration,
                AppointmentType::Sequence => None,
            },
            patient_count,
            slot_id: self.slot_id.clone(),
        })
    }
}
