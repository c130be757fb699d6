//! Scheduling services: the remote collaborator and the dialog workflows

pub mod adjustment;
pub mod backend;
pub mod calendar;
pub mod weekly;

use chrono::NaiveDate;
use std::{future::Future, sync::Arc};
use tokio::sync::watch;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{ExistingSchedule, SessionContext, SlotDuration},
};

pub use adjustment::{AdjustmentState, TemporaryAdjustmentWorkflow};
pub use backend::{HttpSchedulingBackend, SchedulingBackend};
pub use calendar::{CalendarLegend, DayStatus};
pub use weekly::{day_outside_range, WeeklyScheduleWorkflow, WorkflowState};

/// Container for the backend and the session every workflow is bound to
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn SchedulingBackend>,
    pub session: SessionContext,
}

impl Services {
    pub fn new(backend: Arc<dyn SchedulingBackend>, session: SessionContext) -> Self {
        Self { backend, session }
    }

    /// Build services talking HTTP to the configured backend
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let session = config.session_context();
        let backend = HttpSchedulingBackend::new(&config.backend, &session)?;
        Ok(Self::new(Arc::new(backend), session))
    }

    /// "Create new calendar" dialog
    pub fn new_weekly_schedule(&self) -> WeeklyScheduleWorkflow {
        WeeklyScheduleWorkflow::new(self.session.clone())
    }

    /// Edit dialog for a schedule listed by the backend
    pub fn edit_weekly_schedule(
        &self,
        existing: &ExistingSchedule,
    ) -> AppResult<WeeklyScheduleWorkflow> {
        WeeklyScheduleWorkflow::edit(self.session.clone(), existing)
    }

    pub fn temporary_adjustment(
        &self,
        slot_id: impl Into<String>,
        date: NaiveDate,
        slot_duration: Option<SlotDuration>,
    ) -> TemporaryAdjustmentWorkflow {
        TemporaryAdjustmentWorkflow::new(self.session.clone(), slot_id, date, slot_duration)
    }

    pub async fn calendar_legend(&self) -> AppResult<CalendarLegend> {
        CalendarLegend::fetch(self.backend.as_ref(), &self.session).await
    }
}

// ---------------------------------------------------------------------------
// Dialog lifetime
// ---------------------------------------------------------------------------

/// Closes a dialog from outside the workflow that owns it.
///
/// In-flight remote calls of that workflow resolve to
/// [`AppError::Cancelled`] and their late responses are dropped.
#[derive(Clone, Debug)]
pub struct CloseHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CloseHandle {
    pub fn close(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Cancellation signal tied to one dialog
#[derive(Debug)]
pub(crate) struct DialogLifetime {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl DialogLifetime {
    pub(crate) fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub(crate) fn handle(&self) -> CloseHandle {
        CloseHandle {
            tx: Arc::clone(&self.tx),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.rx.borrow()
    }

    /// Race a remote call against the close signal
    pub(crate) async fn guard<F, T>(&self, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if self.is_closed() {
            return Err(AppError::Cancelled);
        }

        let rx = self.rx.clone();
        tokio::select! {
            biased;
            _ = wait_closed(rx) => {
                tracing::info!("Dialog closed, dropping in-flight response");
                Err(AppError::Cancelled)
            }
            result = call => result,
        }
    }
}

async fn wait_closed(mut rx: watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            // Sender gone: the dialog can no longer be closed
            std::future::pending::<()>().await;
        }
    }
}
