use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::error::AppError;
use shared_models::Session;
use shared_utils::extractor::ValidatedJson;
use shared_utils::AppState;

use crate::models::{DeleteProfileRequest, PaymentRequest, UpdateProfileRequest, VerifyPaymentRequest};
use crate::services::payment::PaymentService;
use crate::services::profile::ProfileService;

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let profile = ProfileService::new(&state)
        .get_profile(&session.principal_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "user_data": profile
    })))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let profile = ProfileService::new(&state)
        .update_profile(&session.principal_id, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile Updated",
        "user_data": profile
    })))
}

#[axum::debug_handler]
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    ValidatedJson(request): ValidatedJson<DeleteProfileRequest>,
) -> Result<Json<Value>, AppError> {
    ProfileService::new(&state)
        .delete_profile(&session.principal_id, &request.confirmation)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Account deleted successfully"
    })))
}

#[axum::debug_handler]
pub async fn payment_razorpay(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    ValidatedJson(request): ValidatedJson<PaymentRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Payment order requested for {}", request.appointment_id);
    let order = PaymentService::new(&state)
        .create_order(&session.principal_id, &request.appointment_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "order": order
    })))
}

#[axum::debug_handler]
pub async fn verify_razorpay(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    ValidatedJson(request): ValidatedJson<VerifyPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    PaymentService::new(&state)
        .verify_payment(&session.principal_id, &request.order_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Payment Successful"
    })))
}
