//! Temporary adjustment workflow against the fake backend

use chrono::NaiveDate;
use std::sync::Arc;

use clinic_scheduler::{
    models::{AdjustmentSlot, SlotDuration, TimeSlot},
    services::{AdjustmentState, Services},
};

use crate::support::{session, FakeBackend};

#[tokio::test]
async fn test_close_whole_day() {
    let backend = FakeBackend::accepting();
    let services = Services::new(Arc::new(backend.clone()), session());

    let date = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
    let mut workflow = services.temporary_adjustment("501", date, Some(SlotDuration::Min15));
    workflow
        .update_slot(0, AdjustmentSlot::available(TimeSlot::new(9, 0, 12, 0)))
        .unwrap();
    workflow.mark_not_available().unwrap();

    tokio_test::assert_ok!(workflow.submit(services.backend.as_ref()).await);
    assert_eq!(workflow.state(), AdjustmentState::Success);

    let recorded = backend.recorded.lock().unwrap();
    let sent = &recorded.adjusted[0];
    assert_eq!(sent.day_time, "notavailable");
    assert_eq!(sent.start_date, "24/12/2025");
    assert_eq!(sent.slot_id, "501");
    assert_eq!(sent.facility_id, "19");
}

#[tokio::test]
async fn test_shortened_day() {
    let mut backend = FakeBackend::accepting();
    backend.submit_status = Some("False".into());
    let services = Services::new(Arc::new(backend.clone()), session());

    let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
    let mut workflow = services.temporary_adjustment("501", date, Some(SlotDuration::Min30));
    workflow
        .update_slot(0, AdjustmentSlot::available(TimeSlot::new(9, 0, 13, 0)))
        .unwrap();

    let err = workflow.submit(services.backend.as_ref()).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(workflow.state(), AdjustmentState::Failed);
    assert_eq!(
        backend.recorded.lock().unwrap().adjusted[0].day_time,
        "09-00-13-00"
    );
}
