use std::sync::Arc;

use axum::{
    extract::{Json, State},
};
use serde_json::{json, Value};
use tracing::info;

use doctor_cell::models::{AddDoctorRequest, DoctorIdRequest};
use doctor_cell::DirectoryService;
use shared_models::error::AppError;
use shared_utils::extractor::ValidatedJson;
use shared_utils::AppState;

use crate::services::dashboard::DashboardService;

#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AddDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = DirectoryService::new(&state).add_doctor(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor Added",
        "doctor": doctor
    })))
}

#[axum::debug_handler]
pub async fn all_doctors(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let doctors = DirectoryService::new(&state).all_doctors().await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

#[axum::debug_handler]
pub async fn change_availability(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DoctorIdRequest>,
) -> Result<Json<Value>, AppError> {
    let available = DirectoryService::new(&state)
        .toggle_availability(&request.doctor_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Availability Changed",
        "available": available
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DoctorIdRequest>,
) -> Result<Json<Value>, AppError> {
    let removed = DirectoryService::new(&state)
        .delete_doctor(&request.doctor_id)
        .await?;
    info!("Admin removed doctor {}", request.doctor_id);

    Ok(Json(json!({
        "success": true,
        "message": "Doctor deleted successfully",
        "appointments_removed": removed
    })))
}

#[axum::debug_handler]
pub async fn admin_dashboard(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let dashboard = DashboardService::new(&state).summary().await?;

    Ok(Json(json!({
        "success": true,
        "dash_data": dashboard
    })))
}
