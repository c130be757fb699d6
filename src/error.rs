//! Error types for the clinic scheduler

use thiserror::Error;

/// Fallback shown when the backend refuses a call without a message
pub const GENERIC_BACKEND_MESSAGE: &str = "The scheduling service rejected the request.";

/// Fallback shown for network and decoding failures
pub const TRY_AGAIN_MESSAGE: &str = "Something went wrong, please try again.";

/// Error classification codes, one per failure class.
///
/// Also the process exit status of the binary, so codes start above the
/// generic failure (1) and usage (2) statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    BadValue = 3,
    DayNotInRange = 4,
    InvalidState = 5,
    Busy = 6,
    BackendRefused = 7,
    Transport = 8,
    Cancelled = 9,
    Config = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Day not available: {0}")]
    DayUnavailable(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("A request is already in progress")]
    Busy,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request cancelled: dialog closed")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Build a backend error from an optional backend message
    pub fn backend(message: Option<&str>) -> Self {
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_BACKEND_MESSAGE);
        AppError::Backend(message.to_string())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::DayUnavailable(_) => ErrorCode::DayNotInRange,
            AppError::InvalidState(_) => ErrorCode::InvalidState,
            AppError::Busy => ErrorCode::Busy,
            AppError::Backend(_) => ErrorCode::BackendRefused,
            AppError::Transport(_) => ErrorCode::Transport,
            AppError::Cancelled => ErrorCode::Cancelled,
            AppError::Config(_) => ErrorCode::Config,
        }
    }

    /// Text for the transient notification shown to the user.
    ///
    /// Local and backend messages are surfaced verbatim; transport failures
    /// are replaced by a generic retry hint.
    pub fn notification(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::DayUnavailable(msg)
            | AppError::InvalidState(msg)
            | AppError::Backend(msg) => msg.clone(),
            AppError::Busy => "Please wait for the current request to finish.".to_string(),
            AppError::Transport(detail) => {
                tracing::error!("Transport error: {}", detail);
                TRY_AGAIN_MESSAGE.to_string()
            }
            AppError::Cancelled => String::new(),
            AppError::Config(e) => format!("Configuration error: {}", e),
        }
    }

    /// Whether the user can simply re-invoke the action
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Backend(_) | AppError::Transport(_) | AppError::Busy)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Transport(format!("Malformed payload: {}", e))
    }
}

/// Result type alias for scheduler operations
pub type AppResult<T> = Result<T, AppError>;
