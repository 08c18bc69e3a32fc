use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;

use shared_database::{ClinicStore, MemoryStore, StoreError};
use shared_models::{Address, Appointment, AppointmentFilter, BookedSlots, Doctor, User};

fn doctor(id: &str, email: &str) -> Doctor {
    Doctor {
        id: id.to_string(),
        name: format!("Dr. {}", id),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        image: String::new(),
        speciality: "Dermatologist".to_string(),
        degree: "MBBS".to_string(),
        experience: "3 Years".to_string(),
        about: String::new(),
        available: true,
        fee: 40.0,
        address: Address::default(),
        booked_slots: BookedSlots::new(),
        created_at: Utc::now(),
    }
}

fn appointment(id: &str, doctor_id: &str, user_id: &str, time: &str) -> Appointment {
    Appointment {
        id: id.to_string(),
        doctor_id: doctor_id.to_string(),
        user_id: user_id.to_string(),
        slot_date: "5_6_2024".to_string(),
        slot_time: time.to_string(),
        fee: 40.0,
        cancelled: false,
        is_completed: false,
        payment: false,
        payment_order_id: None,
        doctor_name: String::new(),
        doctor_speciality: String::new(),
        doctor_image: String::new(),
        patient_name: String::new(),
        patient_email: String::new(),
        created_at: Utc::now(),
    }
}

async fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_doctor(doctor("d1", "d1@example.com")).await.unwrap();
    store.insert_doctor(doctor("d2", "d2@example.com")).await.unwrap();
    store
        .insert_user(User::new("u1".into(), "Ann".into(), "ann@example.com".into(), "hash".into()))
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn duplicate_email_is_rejected_across_collections() {
    let store = seeded().await;
    let err = store
        .insert_user(User::new("u2".into(), "Bob".into(), "D1@example.com".into(), "hash".into()))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Duplicate(_));
}

#[tokio::test]
async fn book_slot_marks_the_doctor_and_rejects_the_second_booking() {
    let store = seeded().await;
    store.book_slot(appointment("a1", "d1", "u1", "10:00 AM")).await.unwrap();

    let doc = store.find_doctor("d1").await.unwrap().unwrap();
    assert!(doc.is_slot_booked("5_6_2024", "10:00 AM"));

    let err = store.book_slot(appointment("a2", "d1", "u1", "10:00 AM")).await.unwrap_err();
    assert_matches!(err, StoreError::SlotTaken);

    // Same time with another doctor is fine.
    store.book_slot(appointment("a3", "d2", "u1", "10:00 AM")).await.unwrap();
}

#[tokio::test]
async fn book_slot_for_missing_doctor_is_not_found() {
    let store = seeded().await;
    let err = store.book_slot(appointment("a1", "nobody", "u1", "10:00 AM")).await.unwrap_err();
    assert_matches!(err, StoreError::NotFound("Doctor"));
}

#[tokio::test]
async fn concurrent_bookings_of_one_slot_admit_exactly_one() {
    let store = Arc::new(seeded().await);

    let attempts = (0..16).map(|i| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .book_slot(appointment(&format!("a{}", i), "d1", "u1", "11:30 AM"))
                .await
        })
    });
    let results = futures::future::join_all(attempts).await;

    let admitted = results.iter().filter(|r| matches!(r, Ok(Ok(_)))).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Ok(Err(StoreError::SlotTaken))))
        .count();
    assert_eq!(admitted, 1);
    assert_eq!(rejected, 15);

    let active = store.list_appointments(&AppointmentFilter::for_doctor("d1")).await.unwrap();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn cancel_releases_slot_and_is_terminal() {
    let store = seeded().await;
    store.book_slot(appointment("a1", "d1", "u1", "10:00 AM")).await.unwrap();

    let cancelled = store.cancel_appointment("a1").await.unwrap();
    assert!(cancelled.cancelled);
    let doc = store.find_doctor("d1").await.unwrap().unwrap();
    assert!(!doc.is_slot_booked("5_6_2024", "10:00 AM"));

    assert_matches!(store.cancel_appointment("a1").await, Err(StoreError::Closed("cancelled")));
    assert_matches!(store.complete_appointment("a1").await, Err(StoreError::Closed("cancelled")));

    // The freed slot can be booked again.
    store.book_slot(appointment("a2", "d1", "u1", "10:00 AM")).await.unwrap();
}

#[tokio::test]
async fn completed_appointment_keeps_its_slot() {
    let store = seeded().await;
    store.book_slot(appointment("a1", "d1", "u1", "10:00 AM")).await.unwrap();
    store.complete_appointment("a1").await.unwrap();

    let doc = store.find_doctor("d1").await.unwrap().unwrap();
    assert!(doc.is_slot_booked("5_6_2024", "10:00 AM"));
    assert_matches!(store.cancel_appointment("a1").await, Err(StoreError::Closed("completed")));
}

#[tokio::test]
async fn delete_doctor_cascades_to_appointments() {
    let store = seeded().await;
    store.book_slot(appointment("a1", "d1", "u1", "10:00 AM")).await.unwrap();
    store.book_slot(appointment("a2", "d1", "u1", "10:30 AM")).await.unwrap();
    store.book_slot(appointment("a3", "d2", "u1", "10:00 AM")).await.unwrap();

    assert_eq!(store.delete_doctor("d1").await.unwrap(), Some(2));
    assert!(store.find_doctor("d1").await.unwrap().is_none());
    assert!(store
        .list_appointments(&AppointmentFilter::for_doctor("d1"))
        .await
        .unwrap()
        .is_empty());
    assert_eq!(store.list_appointments(&AppointmentFilter::default()).await.unwrap().len(), 1);

    assert_eq!(store.delete_doctor("d1").await.unwrap(), None);
}

#[tokio::test]
async fn delete_user_frees_held_slots() {
    let store = seeded().await;
    store.book_slot(appointment("a1", "d1", "u1", "10:00 AM")).await.unwrap();

    assert_eq!(store.delete_user("u1").await.unwrap(), Some(1));
    let doc = store.find_doctor("d1").await.unwrap().unwrap();
    assert!(doc.booked_slots.is_empty());
    assert!(store.find_user("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn toggle_flips_availability() {
    let store = seeded().await;
    let doc = store.toggle_availability("d1").await.unwrap().unwrap();
    assert!(!doc.available);
    let doc = store.toggle_availability("d1").await.unwrap().unwrap();
    assert!(doc.available);
    assert!(store.toggle_availability("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn mark_paid_refuses_cancelled_appointments() {
    let store = seeded().await;
    store.book_slot(appointment("a1", "d1", "u1", "10:00 AM")).await.unwrap();
    store.cancel_appointment("a1").await.unwrap();
    assert_matches!(store.mark_paid("a1").await, Err(StoreError::Closed("cancelled")));
    assert_matches!(store.mark_paid("nope").await, Err(StoreError::NotFound("Appointment")));
}
