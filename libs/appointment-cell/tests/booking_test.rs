use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime};
use futures::future::join_all;

use appointment_cell::models::{AppointmentError, AppointmentStatus, BookAppointmentRequest};
use appointment_cell::services::booking::AppointmentBookingService;
use doctor_cell::services::slots::available_slots;
use shared_database::ClinicStore;
use shared_models::{AppointmentFilter, Role, Session};
use shared_utils::test_utils::TestContext;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 6, 5)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn request(doctor_id: &str, slot_date: &str, slot_time: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doctor_id: doctor_id.to_string(),
        slot_date: slot_date.to_string(),
        slot_time: slot_time.to_string(),
    }
}

#[tokio::test]
async fn booking_then_relisting_excludes_the_time() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let service = AppointmentBookingService::new(&ctx.state);

    let appointment = service
        .book_appointment(&jane.id, request(&doctor.id, "6_6_2030", "02:30 PM"), now())
        .await
        .unwrap();

    assert!(!appointment.cancelled && !appointment.is_completed && !appointment.payment);
    assert_eq!(appointment.fee, doctor.fee);
    assert_eq!(appointment.patient_name, "Jane");

    let doctor = ctx.store.find_doctor(&doctor.id).await.unwrap().unwrap();
    assert!(doctor.is_slot_booked("6_6_2030", "02:30 PM"));
    let tomorrow = &available_slots(&doctor.booked_slots, now())[1];
    assert!(tomorrow.iter().all(|slot| slot.time != "02:30 PM"));
    assert_eq!(tomorrow.len(), 21);
}

#[tokio::test]
async fn taken_slot_is_unavailable() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let john = ctx.seed_patient("John", "john@example.com").await;
    let service = AppointmentBookingService::new(&ctx.state);

    service
        .book_appointment(&jane.id, request(&doctor.id, "6_6_2030", "10:00 AM"), now())
        .await
        .unwrap();

    assert_matches!(
        service
            .book_appointment(&john.id, request(&doctor.id, "6_6_2030", "10:00 AM"), now())
            .await,
        Err(AppointmentError::SlotNotAvailable)
    );
}

#[tokio::test]
async fn concurrent_bookings_admit_exactly_one() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let mut patients = Vec::new();
    for i in 0..8 {
        patients.push(
            ctx.seed_patient(&format!("Patient {}", i), &format!("p{}@example.com", i))
                .await,
        );
    }

    let state = ctx.state.clone();
    let tasks = patients.into_iter().map(|patient| {
        let state = Arc::clone(&state);
        let doctor_id = doctor.id.clone();
        tokio::spawn(async move {
            AppointmentBookingService::new(&state)
                .book_appointment(&patient.id, request(&doctor_id, "7_6_2030", "11:30 AM"), now())
                .await
        })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert_matches!(result, Err(AppointmentError::SlotNotAvailable));
    }

    let booked = ctx
        .store
        .list_appointments(&AppointmentFilter::for_doctor(&doctor.id))
        .await
        .unwrap();
    assert_eq!(booked.len(), 1);
}

#[tokio::test]
async fn unavailable_doctor_and_missing_parties() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let service = AppointmentBookingService::new(&ctx.state);

    assert_matches!(
        service
            .book_appointment(&jane.id, request("missing", "6_6_2030", "10:00 AM"), now())
            .await,
        Err(AppointmentError::DoctorNotFound)
    );
    assert_matches!(
        service
            .book_appointment("ghost", request(&doctor.id, "6_6_2030", "10:00 AM"), now())
            .await,
        Err(AppointmentError::PatientNotFound)
    );

    ctx.store.toggle_availability(&doctor.id).await.unwrap();
    assert_matches!(
        service
            .book_appointment(&jane.id, request(&doctor.id, "6_6_2030", "10:00 AM"), now())
            .await,
        Err(AppointmentError::DoctorNotAvailable)
    );
}

#[tokio::test]
async fn slots_off_the_grid_are_rejected() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let service = AppointmentBookingService::new(&ctx.state);

    for (date, time) in [
        ("6_6_2030", "10:15 AM"),
        ("6_6_2030", "09:00 PM"),
        ("20_6_2030", "10:00 AM"),
        ("4_6_2030", "10:00 AM"),
        ("06_06_2030", "10:00 AM"),
        ("6_6_2030", "10:00"),
    ] {
        assert_matches!(
            service
                .book_appointment(&jane.id, request(&doctor.id, date, time), now())
                .await,
            Err(AppointmentError::SlotNotOffered { .. }),
            "{} {}",
            date,
            time
        );
    }
}

#[tokio::test]
async fn doctor_cannot_cancel_a_foreign_appointment() {
    let ctx = TestContext::new();
    let richard = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let emily = ctx.seed_doctor("Dr. Emily Larson", "emily@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let appointment = ctx.seed_appointment(&richard, &jane, "6_6_2030", "10:00 AM").await;
    let service = AppointmentBookingService::new(&ctx.state);

    assert_matches!(
        service
            .cancel_appointment(&appointment.id, &Session::new(&emily.id, Role::Doctor))
            .await,
        Err(AppointmentError::Unauthorized)
    );

    let unchanged = ctx.store.find_appointment(&appointment.id).await.unwrap().unwrap();
    assert!(!unchanged.cancelled);
}

#[tokio::test]
async fn patient_can_cancel_only_their_own() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let john = ctx.seed_patient("John", "john@example.com").await;
    let appointment = ctx.seed_appointment(&doctor, &jane, "6_6_2030", "10:00 AM").await;
    let service = AppointmentBookingService::new(&ctx.state);

    assert_matches!(
        service
            .cancel_appointment(&appointment.id, &Session::new(&john.id, Role::Patient))
            .await,
        Err(AppointmentError::Unauthorized)
    );

    let cancelled = service
        .cancel_appointment(&appointment.id, &Session::new(&jane.id, Role::Patient))
        .await
        .unwrap();
    assert!(cancelled.cancelled);
}

#[tokio::test]
async fn cancellation_frees_the_slot_for_rebooking() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let john = ctx.seed_patient("John", "john@example.com").await;
    let service = AppointmentBookingService::new(&ctx.state);

    let first = service
        .book_appointment(&jane.id, request(&doctor.id, "6_6_2030", "10:00 AM"), now())
        .await
        .unwrap();
    service
        .cancel_appointment(&first.id, &Session::new(&doctor.id, Role::Doctor))
        .await
        .unwrap();

    let stored = ctx.store.find_doctor(&doctor.id).await.unwrap().unwrap();
    assert!(!stored.is_slot_booked("6_6_2030", "10:00 AM"));

    let second = service
        .book_appointment(&john.id, request(&doctor.id, "6_6_2030", "10:00 AM"), now())
        .await
        .unwrap();
    assert_eq!(second.user_id, john.id);
}

#[tokio::test]
async fn admin_can_cancel_any_appointment() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let appointment = ctx.seed_appointment(&doctor, &jane, "6_6_2030", "10:00 AM").await;

    let cancelled = AppointmentBookingService::new(&ctx.state)
        .cancel_appointment(
            &appointment.id,
            &Session::new(&ctx.config.admin_email, Role::Admin),
        )
        .await
        .unwrap();
    assert!(cancelled.cancelled);
}

#[tokio::test]
async fn completion_rules() {
    let ctx = TestContext::new();
    let richard = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let emily = ctx.seed_doctor("Dr. Emily Larson", "emily@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let appointment = ctx.seed_appointment(&richard, &jane, "6_6_2030", "10:00 AM").await;
    let service = AppointmentBookingService::new(&ctx.state);

    assert_matches!(
        service.complete_appointment(&appointment.id, &emily.id).await,
        Err(AppointmentError::Unauthorized)
    );
    assert_matches!(
        service.complete_appointment("missing", &richard.id).await,
        Err(AppointmentError::NotFound)
    );

    let done = service
        .complete_appointment(&appointment.id, &richard.id)
        .await
        .unwrap();
    assert!(done.is_completed);

    // Terminal states exclude each other
    assert_matches!(
        service.complete_appointment(&appointment.id, &richard.id).await,
        Err(AppointmentError::InvalidStatusTransition(AppointmentStatus::Completed))
    );
    assert_matches!(
        service
            .cancel_appointment(&appointment.id, &Session::new(&richard.id, Role::Doctor))
            .await,
        Err(AppointmentError::InvalidStatusTransition(AppointmentStatus::Completed))
    );

    // A completed visit keeps its slot
    let stored = ctx.store.find_doctor(&richard.id).await.unwrap().unwrap();
    assert!(stored.is_slot_booked("6_6_2030", "10:00 AM"));
}

#[tokio::test]
async fn cancelled_appointment_cannot_be_completed() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let appointment = ctx.seed_appointment(&doctor, &jane, "6_6_2030", "10:00 AM").await;
    let service = AppointmentBookingService::new(&ctx.state);

    service
        .cancel_appointment(&appointment.id, &Session::new(&jane.id, Role::Patient))
        .await
        .unwrap();
    assert_matches!(
        service.complete_appointment(&appointment.id, &doctor.id).await,
        Err(AppointmentError::InvalidStatusTransition(AppointmentStatus::Cancelled))
    );
}

#[tokio::test]
async fn listings_are_scoped() {
    let ctx = TestContext::new();
    let richard = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;
    let emily = ctx.seed_doctor("Dr. Emily Larson", "emily@clinic.com").await;
    let jane = ctx.seed_patient("Jane", "jane@example.com").await;
    let john = ctx.seed_patient("John", "john@example.com").await;
    ctx.seed_appointment(&richard, &jane, "6_6_2030", "10:00 AM").await;
    ctx.seed_appointment(&emily, &jane, "6_6_2030", "10:00 AM").await;
    ctx.seed_appointment(&richard, &john, "6_6_2030", "10:30 AM").await;
    let service = AppointmentBookingService::new(&ctx.state);

    assert_eq!(service.list_for_user(&jane.id).await.unwrap().len(), 2);
    assert_eq!(service.list_for_doctor(&richard.id).await.unwrap().len(), 2);
    assert_eq!(service.list_for_doctor(&emily.id).await.unwrap().len(), 1);
    assert_eq!(service.list_all().await.unwrap().len(), 3);
}
