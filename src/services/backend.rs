//! Remote scheduling service client

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use crate::{
    config::BackendConfig,
    error::{AppError, AppResult},
    models::{
        AvailabilityCheckRequest, SessionContext, SlotDatesRequest, SlotDatesResponse,
        SlotRequest, StatusResponse, TemporaryAdjustRequest,
    },
};

pub const CHECK_DAY_AVAILABILITY_PATH: &str = "checkdayavailability";
pub const ADD_SLOT_PATH: &str = "addslot";
pub const EDIT_SLOT_PATH: &str = "editslot";
pub const TEMPORARY_ADJUST_PATH: &str = "temporaryadjustcalendar";
pub const SLOT_DATES_PATH: &str = "getslotdates";

/// Operations offered by the remote scheduling authority.
///
/// Implementations return the decoded envelope; deciding whether a status
/// means success is left to the caller because the marker differs per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulingBackend: Send + Sync {
    async fn check_day_availability(
        &self,
        request: &AvailabilityCheckRequest,
    ) -> AppResult<StatusResponse>;

    async fn add_slot(&self, request: &SlotRequest) -> AppResult<StatusResponse>;

    async fn edit_slot(&self, request: &SlotRequest) -> AppResult<StatusResponse>;

    async fn temporary_adjust(&self, request: &TemporaryAdjustRequest)
        -> AppResult<StatusResponse>;

    async fn slot_dates(&self, request: &SlotDatesRequest) -> AppResult<SlotDatesResponse>;
}

/// JSON-over-HTTP implementation
#[derive(Clone)]
pub struct HttpSchedulingBackend {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpSchedulingBackend {
    pub fn new(config: &BackendConfig, session: &SessionContext) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: session.credential_token.clone(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> AppResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(&url).json(body);
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!("{} returned HTTP {}", url, status);
            // Backends often put a usable message in error bodies too
            return match serde_json::from_str::<StatusResponse>(&text) {
                Ok(StatusResponse {
                    message: Some(message),
                    ..
                }) if !message.trim().is_empty() => Err(AppError::Backend(message)),
                _ => Err(AppError::Transport(format!("HTTP {} from {}", status, url))),
            };
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl SchedulingBackend for HttpSchedulingBackend {
    async fn check_day_availability(
        &self,
        request: &AvailabilityCheckRequest,
    ) -> AppResult<StatusResponse> {
        self.post_json(CHECK_DAY_AVAILABILITY_PATH, request).await
    }

    async fn add_slot(&self, request: &SlotRequest) -> AppResult<StatusResponse> {
        self.post_json(ADD_SLOT_PATH, request).await
    }

    async fn edit_slot(&self, request: &SlotRequest) -> AppResult<StatusResponse> {
        self.post_json(EDIT_SLOT_PATH, request).await
    }

    async fn temporary_adjust(
        &self,
        request: &TemporaryAdjustRequest,
    ) -> AppResult<StatusResponse> {
        self.post_json(TEMPORARY_ADJUST_PATH, request).await
    }

    async fn slot_dates(&self, request: &SlotDatesRequest) -> AppResult<SlotDatesResponse> {
        self.post_json(SLOT_DATES_PATH, request).await
    }
}
