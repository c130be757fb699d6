//! Tests against a running scheduling service

use clinic_scheduler::{
    config::AppConfig,
    services::{DayStatus, Services},
};

#[tokio::test]
#[ignore] // Run with: CLINIC_BACKEND__BASE_URL=... cargo test -- --ignored
async fn test_live_calendar_legend() {
    let config = AppConfig::load().expect("Failed to load configuration");
    let services = Services::from_config(&config).expect("Failed to build services");

    let legend = services
        .calendar_legend()
        .await
        .expect("Failed to fetch calendar legend");

    for date in &legend.available {
        assert_ne!(legend.status_of(*date), DayStatus::Unscheduled);
    }
}
