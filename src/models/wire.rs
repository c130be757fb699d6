//! Request/response records exchanged with the remote scheduling service.
//!
//! Field names follow the backend's camelCase contract. Responses are
//! decoded leniently where the backend is known to be loose (status may be
//! a string or a bool, ids and durations may be numbers or strings) and
//! then checked explicitly by the caller.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use super::enums::{AppointmentType, SlotDuration};
use super::schedule::SessionContext;

/// Expected success marker; it differs between operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessStatus {
    /// `"Success"` (availability check, add slot)
    Success,
    /// `"True"` (edit slot, temporary adjustment)
    True,
}

impl SuccessStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SuccessStatus::Success => "Success",
            SuccessStatus::True => "True",
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Identity fields carried opaquely by every request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthFields {
    pub user_name: String,
    pub org_id: String,
}

impl From<&SessionContext> for AuthFields {
    fn from(session: &SessionContext) -> Self {
        Self {
            user_name: session.username.clone(),
            org_id: session.org_id.clone(),
        }
    }
}

/// Pre-submission gate for a weekly schedule
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityCheckRequest {
    #[serde(flatten)]
    pub auth: AuthFields,
    pub facility_id: String,
    /// DD/MM/YYYY
    pub start_date: String,
    /// DD/MM/YYYY
    pub stop_date: String,
}

/// Create (no `slot_id`) or edit (with `slot_id`) a weekly schedule
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    #[serde(flatten)]
    pub auth: AuthFields,
    pub facility_id: String,
    pub book_app_type: AppointmentType,
    /// Full weekday names, comma separated
    pub checked_day: String,
    /// Day-time wire string
    pub day_time: String,
    pub start_date: String,
    pub stop_date: String,
    pub slot_duration: Option<SlotDuration>,
    /// SEQUENCE mode only: patient count per slot row, joined by `~`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
}

/// Single-date override
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryAdjustRequest {
    #[serde(flatten)]
    pub auth: AuthFields,
    pub start_date: String,
    pub facility_id: String,
    /// Day-time wire string or `notavailable`
    pub day_time: String,
    pub slot_duration: Option<SlotDuration>,
    pub slot_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlotDatesRequest {
    #[serde(flatten)]
    pub auth: AuthFields,
    pub facility_id: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Generic `{ status, message }` envelope
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    #[serde(default, deserialize_with = "scalar_text")]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn is_success(&self, expected: SuccessStatus) -> bool {
        self.status
            .as_deref()
            .map(|s| s.trim().eq_ignore_ascii_case(expected.as_str()))
            .unwrap_or(false)
    }
}

/// Calendar legend lists, each a comma separated list of dates
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SlotDatesResponse {
    #[serde(default)]
    pub available: Option<String>,
    #[serde(default)]
    pub notavailable: Option<String>,
    #[serde(default)]
    pub fullavailable: Option<String>,
}

/// A weekly schedule as listed by the backend, used to enter edit mode
#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExistingSchedule {
    #[serde(deserialize_with = "required_scalar_text")]
    pub slot_id: String,
    pub book_app_type: AppointmentType,
    #[serde(default)]
    pub checked_day: String,
    #[serde(default)]
    pub day_time: String,
    pub start_date: String,
    pub stop_date: String,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub slot_duration: Option<SlotDuration>,
}

/// Decode a string, number or bool into its text form
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Bool(b)) => Ok(Some(if b { "True" } else { "False" }.to_string())),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar, found {}",
            other
        ))),
    }
}

fn required_scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(deserializer)?.ok_or_else(|| D::Error::custom("missing value"))
}
