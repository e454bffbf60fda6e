use super::common::*;
use crate::workflows::decline::domain::{
    AppointmentId, AppointmentStatus, DeclineAction, HomeAttributeField, HomeDetailsPatch, HomeId,
};
use crate::workflows::decline::repository::RepositoryError;
use crate::workflows::decline::service::{DeclineOutcome, DeclineServiceError};

#[test]
fn record_decline_publishes_notification() {
    let (service, appointments, homes, notifications) = build_service();
    appointments.insert(scheduled_appointment(7, 42));
    homes.insert(partial_home(42));

    let notification = service
        .record_decline(AppointmentId(7), Some("Crew double-booked".to_string()))
        .expect("decline records");

    assert_eq!(notification.appointment_id, AppointmentId(7));
    assert_eq!(
        notification.business_owner_name.as_deref(),
        Some("Brightside Cleaning Co.")
    );
    assert_eq!(notification.reason.as_deref(), Some("Crew double-booked"));

    let stored = appointments.get(AppointmentId(7)).expect("record present");
    assert_eq!(stored.status, AppointmentStatus::Declined);
    assert_eq!(notifications.events(), vec![notification]);
}

#[test]
fn record_decline_twice_is_rejected() {
    let (service, appointments, _, _) = build_service();
    appointments.insert(declined_appointment(7, 42));

    match service.record_decline(AppointmentId(7), None) {
        Err(DeclineServiceError::AlreadyDeclined) => {}
        other => panic!("expected already-declined error, got {other:?}"),
    }
}

#[test]
fn cancel_persists_cancelled_status() {
    let (service, appointments, _, _) = build_service();
    appointments.insert(declined_appointment(7, 42));

    let outcome = service
        .submit_response(AppointmentId(7), DeclineAction::Cancel)
        .expect("cancel succeeds");

    assert_eq!(outcome, DeclineOutcome::Cancelled);
    let stored = appointments.get(AppointmentId(7)).expect("record present");
    assert_eq!(stored.status, AppointmentStatus::Cancelled);
}

#[test]
fn marketplace_reports_missing_fields_exactly() {
    let (service, appointments, homes, _) = build_service();
    appointments.insert(declined_appointment(7, 42));
    homes.insert(partial_home(42));

    let outcome = service
        .submit_response(AppointmentId(7), DeclineAction::Marketplace)
        .expect("marketplace request succeeds");

    assert_eq!(
        outcome,
        DeclineOutcome::NeedsHomeDetails {
            home_id: HomeId(42),
            missing_fields: vec![
                HomeAttributeField::NumBeds,
                HomeAttributeField::TimeToBeCompleted,
            ],
        }
    );
    // Nothing persisted: the appointment is still awaiting resolution.
    let stored = appointments.get(AppointmentId(7)).expect("record present");
    assert_eq!(stored.status, AppointmentStatus::Declined);
}

#[test]
fn marketplace_quotes_price_when_home_is_complete() {
    let (service, appointments, homes, _) = build_service();
    appointments.insert(declined_appointment(7, 42));
    homes.insert(complete_home(42));

    let outcome = service
        .submit_response(AppointmentId(7), DeclineAction::Marketplace)
        .expect("marketplace request succeeds");

    assert_eq!(
        outcome,
        DeclineOutcome::ConfirmRequired {
            home_id: HomeId(42),
            marketplace_price: 180,
            current_price: 150,
        }
    );
}

#[test]
fn confirm_lists_appointment_and_stores_price() {
    let (service, appointments, homes, _) = build_service();
    appointments.insert(declined_appointment(7, 42));
    homes.insert(complete_home(42));

    let listed = service
        .confirm_marketplace(AppointmentId(7))
        .expect("confirmation succeeds");

    assert_eq!(listed.status, AppointmentStatus::OpenToMarketplace);
    assert_eq!(listed.marketplace_price, Some(180));
    let stored = appointments.get(AppointmentId(7)).expect("record present");
    assert_eq!(stored, listed);
}

#[test]
fn confirm_with_incomplete_home_is_rejected() {
    let (service, appointments, homes, _) = build_service();
    appointments.insert(declined_appointment(7, 42));
    homes.insert(partial_home(42));

    match service.confirm_marketplace(AppointmentId(7)) {
        Err(DeclineServiceError::IncompleteHome { missing }) => {
            assert_eq!(
                missing,
                vec![
                    HomeAttributeField::NumBeds,
                    HomeAttributeField::TimeToBeCompleted,
                ]
            );
        }
        other => panic!("expected incomplete home error, got {other:?}"),
    }
}

#[test]
fn resolved_appointment_reports_already_resolved() {
    let (service, appointments, homes, _) = build_service();
    appointments.insert(declined_appointment(7, 42));
    homes.insert(complete_home(42));
    service
        .confirm_marketplace(AppointmentId(7))
        .expect("confirmation succeeds");

    match service.submit_response(AppointmentId(7), DeclineAction::Cancel) {
        Err(DeclineServiceError::AlreadyResolved) => {}
        other => panic!("expected already-resolved error, got {other:?}"),
    }

    let error = service
        .submit_response(AppointmentId(7), DeclineAction::Cancel)
        .expect_err("still resolved");
    assert_eq!(error.to_string(), "Appointment already resolved");
}

#[test]
fn scheduled_appointment_is_not_awaiting_response() {
    let (service, appointments, _, _) = build_service();
    appointments.insert(scheduled_appointment(7, 42));

    match service.submit_response(AppointmentId(7), DeclineAction::Marketplace) {
        Err(DeclineServiceError::NotAwaitingResponse) => {}
        other => panic!("expected not-awaiting error, got {other:?}"),
    }
}

#[test]
fn missing_appointment_is_not_found() {
    let (service, _, _, _) = build_service();

    match service.submit_response(AppointmentId(404), DeclineAction::Cancel) {
        Err(DeclineServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn update_home_applies_partial_patch() {
    let (service, _, homes, _) = build_service();
    homes.insert(partial_home(42));

    let patch = HomeDetailsPatch {
        num_beds: Some(3),
        ..HomeDetailsPatch::default()
    };
    let updated = service
        .update_home(HomeId(42), &patch)
        .expect("update succeeds");

    assert_eq!(updated.num_beds, Some(3));
    assert_eq!(updated.num_baths, Some(2), "untouched field survives");
    assert_eq!(updated.time_to_be_completed, None, "absent field stays absent");
    assert_eq!(homes.get(HomeId(42)), Some(updated));
}
