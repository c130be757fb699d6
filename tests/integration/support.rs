//! In-process stand-in for the remote scheduling service

use async_trait::async_trait;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use clinic_scheduler::{
    models::{
        AvailabilityCheckRequest, SessionContext, SlotDatesRequest, SlotDatesResponse,
        SlotRequest, StatusResponse, TemporaryAdjustRequest,
    },
    services::SchedulingBackend,
    AppResult,
};

/// Everything the fake received, in call order
#[derive(Debug, Default)]
pub struct Recorded {
    pub availability: Vec<AvailabilityCheckRequest>,
    pub added: Vec<SlotRequest>,
    pub edited: Vec<SlotRequest>,
    pub adjusted: Vec<TemporaryAdjustRequest>,
}

#[derive(Clone)]
pub struct FakeBackend {
    pub recorded: Arc<Mutex<Recorded>>,
    pub availability_status: String,
    pub submit_status: Option<String>,
    pub delay: Option<Duration>,
}

impl FakeBackend {
    /// Accepts everything with the status each operation expects
    pub fn accepting() -> Self {
        Self {
            recorded: Arc::new(Mutex::new(Recorded::default())),
            availability_status: "Success".into(),
            submit_status: None,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn status(&self, default: &str) -> StatusResponse {
        StatusResponse {
            status: Some(self.submit_status.clone().unwrap_or_else(|| default.to_string())),
            message: None,
        }
    }
}

#[async_trait]
impl SchedulingBackend for FakeBackend {
    async fn check_day_availability(
        &self,
        request: &AvailabilityCheckRequest,
    ) -> AppResult<StatusResponse> {
        self.pause().await;
        self.recorded.lock().unwrap().availability.push(request.clone());
        Ok(StatusResponse {
            status: Some(self.availability_status.clone()),
            message: Some("Days already scheduled".into()),
        })
    }

    async fn add_slot(&self, request: &SlotRequest) -> AppResult<StatusResponse> {
        self.pause().await;
        self.recorded.lock().unwrap().added.push(request.clone());
        Ok(self.status("Success"))
    }

    async fn edit_slot(&self, request: &SlotRequest) -> AppResult<StatusResponse> {
        self.pause().await;
        self.recorded.lock().unwrap().edited.push(request.clone());
        Ok(self.status("True"))
    }

    async fn temporary_adjust(
        &self,
        request: &TemporaryAdjustRequest,
    ) -> AppResult<StatusResponse> {
        self.pause().await;
        self.recorded.lock().unwrap().adjusted.push(request.clone());
        Ok(self.status("True"))
    }

    async fn slot_dates(&self, _request: &SlotDatesRequest) -> AppResult<SlotDatesResponse> {
        Ok(SlotDatesResponse::default())
    }
}

pub fn session() -> SessionContext {
    SessionContext {
        username: "frontdesk".into(),
        credential_token: "secret".into(),
        org_id: "4".into(),
        facility_id: "19".into(),
    }
}
