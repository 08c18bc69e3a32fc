use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Local;
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_models::Session;
use shared_utils::extractor::ValidatedJson;
use shared_utils::AppState;

use crate::models::{DeleteProfileRequest, UpdateDoctorRequest};
use crate::services::directory::DirectoryService;

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let doctors = DirectoryService::new(&state).list_doctors().await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

/// Free slots for the next seven days, computed at the server's local time.
#[axum::debug_handler]
pub async fn doctor_slots(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let now = Local::now().naive_local();
    let slots = DirectoryService::new(&state)
        .available_slots(&doctor_id, now)
        .await?;

    Ok(Json(json!({
        "success": true,
        "slots": slots
    })))
}

// ==============================================================================
// DOCTOR PANEL HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn doctor_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let profile = DirectoryService::new(&state)
        .doctor_profile(&session.principal_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "profile_data": profile
    })))
}

#[axum::debug_handler]
pub async fn update_doctor_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    ValidatedJson(request): ValidatedJson<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let profile = DirectoryService::new(&state)
        .update_profile(&session.principal_id, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile Updated",
        "profile_data": profile
    })))
}

#[axum::debug_handler]
pub async fn change_availability(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let available = DirectoryService::new(&state)
        .toggle_availability(&session.principal_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Availability Changed",
        "available": available
    })))
}

#[axum::debug_handler]
pub async fn doctor_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let dashboard = DirectoryService::new(&state)
        .dashboard(&session.principal_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "dash_data": dashboard
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    ValidatedJson(request): ValidatedJson<DeleteProfileRequest>,
) -> Result<Json<Value>, AppError> {
    DirectoryService::new(&state)
        .delete_own_profile(&session.principal_id, &request.confirmation)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile deleted successfully"
    })))
}
