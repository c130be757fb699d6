//! Temporary adjustment dialog: override the weekly schedule for one date

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{
        AdjustmentSlot, AppointmentType, AuthFields, SessionContext, SlotDuration,
        StatusResponse, SuccessStatus, TemporaryAdjustRequest, TemporaryAdjustment, MAX_SLOTS,
    },
    scheduling::{
        dates::format_wire_date,
        serializer::serialize_adjustment,
        validator::{self, SlotValidation},
    },
};

use super::{backend::SchedulingBackend, CloseHandle, DialogLifetime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentState {
    Editing,
    Submitting,
    Success,
    Failed,
}

pub struct TemporaryAdjustmentWorkflow {
    session: SessionContext,
    slot_id: String,
    adjustment: TemporaryAdjustment,
    state: AdjustmentState,
    lifetime: DialogLifetime,
}

impl TemporaryAdjustmentWorkflow {
    /// Open the dialog for `date` with one empty, available row
    pub fn new(
        session: SessionContext,
        slot_id: impl Into<String>,
        date: NaiveDate,
        slot_duration: Option<SlotDuration>,
    ) -> Self {
        Self {
            session,
            slot_id: slot_id.into(),
            adjustment: TemporaryAdjustment {
                date,
                slots: vec![AdjustmentSlot::default()],
                slot_duration,
            },
            state: AdjustmentState::Editing,
            lifetime: DialogLifetime::new(),
        }
    }

    pub fn state(&self) -> AdjustmentState {
        self.state
    }

    pub fn adjustment(&self) -> &TemporaryAdjustment {
        &self.adjustment
    }

    pub fn close_handle(&self) -> CloseHandle {
        self.lifetime.handle()
    }

    fn ensure_editable(&self) -> AppResult<()> {
        if self.lifetime.is_closed() {
            return Err(AppError::InvalidState(
                "This dialog has been closed.".to_string(),
            ));
        }
        match self.state {
            AdjustmentState::Submitting => Err(AppError::Busy),
            AdjustmentState::Success => Err(AppError::InvalidState(
                "Adjustment already submitted".to_string(),
            )),
            AdjustmentState::Editing | AdjustmentState::Failed => Ok(()),
        }
    }

    fn set_state(&mut self, next: AdjustmentState) {
        if self.state != next {
            tracing::info!("Temporary adjustment: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    // ---- Editing ----

    pub fn add_slot(&mut self) -> AppResult<bool> {
        self.ensure_editable()?;
        if self.adjustment.slots.len() >= MAX_SLOTS {
            return Ok(false);
        }
        self.adjustment.slots.push(AdjustmentSlot::default());
        self.set_state(AdjustmentState::Editing);
        Ok(true)
    }

    pub fn remove_slot(&mut self, index: usize) -> AppResult<bool> {
        self.ensure_editable()?;
        if self.adjustment.slots.len() <= 1 || index >= self.adjustment.slots.len() {
            return Ok(false);
        }
        self.adjustment.slots.remove(index);
        self.set_state(AdjustmentState::Editing);
        Ok(true)
    }

    pub fn update_slot(&mut self, index: usize, slot: AdjustmentSlot) -> AppResult<()> {
        self.ensure_editable()?;
        let row = self
            .adjustment
            .slots
            .get_mut(index)
            .ok_or_else(|| AppError::Validation(format!("No slot row {}", index + 1)))?;
        *row = slot;
        self.set_state(AdjustmentState::Editing);
        Ok(())
    }

    /// Flag every row, closing the whole date
    pub fn mark_not_available(&mut self) -> AppResult<()> {
        self.ensure_editable()?;
        for row in &mut self.adjustment.slots {
            row.not_available = true;
        }
        self.set_state(AdjustmentState::Editing);
        Ok(())
    }

    pub fn set_slot_duration(&mut self, duration: Option<SlotDuration>) -> AppResult<()> {
        self.ensure_editable()?;
        self.adjustment.slot_duration = duration;
        self.set_state(AdjustmentState::Editing);
        Ok(())
    }

    /// Validation over the rows that stay open; a closed date has nothing
    /// to validate
    pub fn validate(&self) -> SlotValidation {
        if self.adjustment.is_not_available() {
            return SlotValidation::default();
        }
        validator::validate(
            &self.adjustment.open_slots(),
            AppointmentType::Timeslot,
            self.adjustment.slot_duration,
        )
    }

    // ---- Submission ----

    pub fn begin_submit(&mut self) -> AppResult<TemporaryAdjustRequest> {
        self.ensure_editable()?;

        if !self.adjustment.is_not_available() && self.adjustment.open_slots().is_empty() {
            return Err(AppError::Validation(
                "Add a time slot or mark the day as not available.".to_string(),
            ));
        }
        if let Some(message) = self.validate().first_error() {
            tracing::warn!("Adjustment validation failed: {}", message);
            return Err(AppError::Validation(message));
        }

        let request = TemporaryAdjustRequest {
            auth: AuthFields::from(&self.session),
            start_date: format_wire_date(self.adjustment.date),
            facility_id: self.session.facility_id.clone(),
            day_time: serialize_adjustment(&self.adjustment.slots),
            slot_duration: self.adjustment.slot_duration,
            slot_id: self.slot_id.clone(),
        };

        self.set_state(AdjustmentState::Submitting);
        Ok(request)
    }

    pub fn on_submitted(&mut self, result: AppResult<StatusResponse>) -> AppResult<()> {
        if self.state != AdjustmentState::Submitting {
            return Err(AppError::InvalidState(format!(
                "No submission in flight ({:?})",
                self.state
            )));
        }

        match result {
            Ok(response) if response.is_success(SuccessStatus::True) => {
                tracing::info!("Adjusted calendar for {}", self.adjustment.date);
                self.set_state(AdjustmentState::Success);
                Ok(())
            }
            Ok(response) => {
                tracing::warn!("Adjustment refused: {:?}", response.message);
                self.set_state(AdjustmentState::Failed);
                Err(AppError::backend(response.message.as_deref()))
            }
            Err(e) => {
                tracing::error!("Adjustment failed: {}", e);
                self.set_state(AdjustmentState::Failed);
                Err(e)
            }
        }
    }

    pub async fn submit(&mut self, backend: &dyn SchedulingBackend) -> AppResult<()> {
        let request = self.begin_submit()?;
        tracing::debug!("Adjusting {} with {}", request.start_date, request.day_time);

        let result = match self.lifetime.guard(backend.temporary_adjust(&request)).await {
            Err(AppError::Cancelled) => return Err(AppError::Cancelled),
            other => other,
        };
        self.on_submitted(result)
    }
}
