//! Weekly schedule workflow driven end to end against the fake backend

use std::{sync::Arc, time::Duration};

use clinic_scheduler::{
    models::{AppointmentType, ExistingSchedule, SlotDuration, TimeSlot, Weekday},
    scheduling::is_day_in_range,
    services::{Services, WorkflowState},
    AppError,
};

use crate::support::{session, FakeBackend};

fn services(backend: &FakeBackend) -> Services {
    Services::new(Arc::new(backend.clone()), session())
}

#[tokio::test]
async fn test_create_schedule_end_to_end() {
    let backend = FakeBackend::accepting();
    let services = services(&backend);

    let mut workflow = services.new_weekly_schedule();
    workflow.set_date_range("01/09/2025", "07/09/2025").unwrap();
    for day in [Weekday::Mon, Weekday::Wed, Weekday::Fri] {
        workflow.toggle_day(day).unwrap();
    }
    workflow.open_slot_editor().unwrap();
    workflow.update_slot(0, TimeSlot::new(10, 0, 12, 0)).unwrap();
    workflow.set_appointment_type(AppointmentType::Timeslot).unwrap();
    workflow.set_slot_duration(Some(SlotDuration::Min30)).unwrap();

    assert!(workflow.validate().is_valid());
    workflow.confirm(services.backend.as_ref()).await.unwrap();
    assert_eq!(workflow.state(), WorkflowState::Success);

    let recorded = backend.recorded.lock().unwrap();
    assert_eq!(recorded.availability.len(), 1);
    assert_eq!(recorded.availability[0].start_date, "01/09/2025");
    assert_eq!(recorded.availability[0].stop_date, "07/09/2025");

    let added = &recorded.added[0];
    assert_eq!(added.checked_day, "Monday,Wednesday,Friday");
    assert_eq!(added.day_time, "10-00-12-00,10-00-12-00,10-00-12-00");
    assert_eq!(added.facility_id, "19");
    assert_eq!(added.auth.user_name, "frontdesk");
    assert!(recorded.edited.is_empty());
}

#[tokio::test]
async fn test_availability_refusal_keeps_dialog_open() {
    let mut backend = FakeBackend::accepting();
    backend.availability_status = "Failed".into();
    let services = services(&backend);

    let mut workflow = services.new_weekly_schedule();
    workflow.set_date_range("01/09/2025", "30/09/2025").unwrap();
    workflow.toggle_day(Weekday::Tue).unwrap();
    workflow.open_slot_editor().unwrap();
    workflow.update_slot(0, TimeSlot::new(9, 0, 13, 0)).unwrap();
    workflow.set_slot_duration(Some(SlotDuration::Min20)).unwrap();

    let err = workflow.confirm(services.backend.as_ref()).await.unwrap_err();
    assert_eq!(err.notification(), "Days already scheduled");
    assert_eq!(workflow.state(), WorkflowState::SlotsConfigured);
    assert!(backend.recorded.lock().unwrap().added.is_empty());

    // Still editable
    assert!(workflow.add_slot().unwrap());
}

#[tokio::test]
async fn test_edit_range_without_weekend_clears_selection() {
    let backend = FakeBackend::accepting();
    let services = services(&backend);

    let existing = ExistingSchedule {
        slot_id: "314".into(),
        book_app_type: AppointmentType::Timeslot,
        checked_day: "Saturday,Sunday".into(),
        day_time: "10-00-11-00,10-00-11-00".into(),
        start_date: "01/09/2025".into(),
        stop_date: "30/09/2025".into(),
        slot_duration: Some(SlotDuration::Min30),
    };
    let mut workflow = services.edit_weekly_schedule(&existing).unwrap();
    assert_eq!(workflow.schedule().days(), vec![Weekday::Sat, Weekday::Sun]);

    // Mon 8 .. Thu 11 Sep 2025
    workflow.set_date_range("08.09.25", "11.09.25").unwrap();
    assert!(workflow.schedule().selected_days.is_empty());
    assert_eq!(workflow.state(), WorkflowState::Idle);

    let err = workflow.confirm(services.backend.as_ref()).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert!(backend.recorded.lock().unwrap().availability.is_empty());
}

#[tokio::test]
async fn test_edit_schedule_submits_slot_id() {
    let backend = FakeBackend::accepting();
    let services = services(&backend);

    let existing = ExistingSchedule {
        slot_id: "27".into(),
        book_app_type: AppointmentType::Sequence,
        checked_day: "Thursday".into(),
        day_time: "08-00-12-00~13-00-17-00".into(),
        start_date: "01/10/2025".into(),
        stop_date: "31/10/2025".into(),
        slot_duration: None,
    };
    let mut workflow = services.edit_weekly_schedule(&existing).unwrap();
    workflow
        .update_slot(0, TimeSlot::new(8, 0, 12, 0).with_patient_count(10))
        .unwrap();
    workflow
        .update_slot(1, TimeSlot::new(13, 0, 17, 0).with_patient_count(12))
        .unwrap();

    workflow.confirm(services.backend.as_ref()).await.unwrap();

    let recorded = backend.recorded.lock().unwrap();
    let edited = &recorded.edited[0];
    assert_eq!(edited.slot_id.as_deref(), Some("27"));
    assert_eq!(edited.day_time, "08-00-12-00~13-00-17-00");
    assert_eq!(edited.patient_count.as_deref(), Some("10~12"));
}

#[tokio::test]
async fn test_close_during_submission_drops_response() {
    let backend = FakeBackend::accepting().with_delay(Duration::from_millis(200));
    let services = services(&backend);

    let mut workflow = services.new_weekly_schedule();
    workflow.set_date_range("01/09/2025", "07/09/2025").unwrap();
    workflow.toggle_day(Weekday::Mon).unwrap();
    workflow.open_slot_editor().unwrap();
    workflow.update_slot(0, TimeSlot::new(9, 0, 10, 0)).unwrap();
    workflow.set_slot_duration(Some(SlotDuration::Min5)).unwrap();

    let handle = workflow.close_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.close();
    });

    let err = workflow.confirm(services.backend.as_ref()).await.unwrap_err();
    assert!(matches!(err, AppError::Cancelled));
    assert_eq!(workflow.state(), WorkflowState::AvailabilityChecking);
    assert!(backend.recorded.lock().unwrap().added.is_empty());
}

#[test]
fn test_day_filter_properties() {
    // Six-day span (seven calendar days) covers every weekday
    for day in Weekday::ALL {
        assert!(is_day_in_range(day, "10/09/2025", "16/09/2025"));
        assert!(is_day_in_range(day, "", ""));
    }

    let single: Vec<_> = Weekday::ALL
        .into_iter()
        .filter(|d| is_day_in_range(*d, "14/09/2025", "14/09/2025"))
        .collect();
    assert_eq!(single, vec![Weekday::Sun]);
}
