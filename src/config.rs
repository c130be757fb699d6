//! Configuration management for the clinic scheduler

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::schedule::SessionContext;

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Root URL of the remote scheduling service
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub username: String,
    pub token: String,
    pub org_id: String,
    pub facility_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (CLINIC_BACKEND__BASE_URL, ...)
            .add_source(
                Environment::with_prefix("CLINIC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Credential token usually comes from the login flow, not a file
            .set_override_option("session.token", env::var("CLINIC_TOKEN").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Session context handed to the backend and the workflows
    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            username: self.session.username.clone(),
            credential_token: self.session.token.clone(),
            org_id: self.session.org_id.clone(),
            facility_id: self.session.facility_id.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_seconds: 15,
            user_agent: format!("clinic-scheduler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            token: String::new(),
            org_id: String::new(),
            facility_id: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
