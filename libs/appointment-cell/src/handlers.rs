use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use chrono::Local;
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_models::Session;
use shared_utils::extractor::ValidatedJson;
use shared_utils::AppState;

use crate::models::{AppointmentIdRequest, BookAppointmentRequest};
use crate::services::booking::AppointmentBookingService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    ValidatedJson(request): ValidatedJson<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let now = Local::now().naive_local();
    let appointment = AppointmentBookingService::new(&state)
        .book_appointment(&session.principal_id, request, now)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment Booked",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn list_user_appointments(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentBookingService::new(&state)
        .list_for_user(&session.principal_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn list_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentBookingService::new(&state)
        .list_for_doctor(&session.principal_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn list_all_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentBookingService::new(&state).list_all().await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

/// Shared by all three panels; ownership is decided from the session's role.
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    ValidatedJson(request): ValidatedJson<AppointmentIdRequest>,
) -> Result<Json<Value>, AppError> {
    AppointmentBookingService::new(&state)
        .cancel_appointment(&request.appointment_id, &session)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment Cancelled"
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    ValidatedJson(request): ValidatedJson<AppointmentIdRequest>,
) -> Result<Json<Value>, AppError> {
    AppointmentBookingService::new(&state)
        .complete_appointment(&request.appointment_id, &session.principal_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment Completed"
    })))
}
