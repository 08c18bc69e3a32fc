use std::sync::Arc;

use axum::{
    extract::{Json, State},
};
use tracing::debug;

use shared_models::auth::{LoginRequest, TokenResponse};
use shared_models::error::AppError;
use shared_utils::extractor::ValidatedJson;
use shared_utils::AppState;

use crate::models::RegisterRequest;
use crate::services::login::AuthService;

#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Registering patient {}", request.email);
    let token = AuthService::new(&state).register_patient(request).await?;
    Ok(Json(TokenResponse::new(token)))
}

#[axum::debug_handler]
pub async fn patient_login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = AuthService::new(&state)
        .patient_login(&request.email, &request.password)
        .await?;
    Ok(Json(TokenResponse::new(token)))
}

#[axum::debug_handler]
pub async fn doctor_login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = AuthService::new(&state)
        .doctor_login(&request.email, &request.password)
        .await?;
    Ok(Json(TokenResponse::new(token)))
}

#[axum::debug_handler]
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = AuthService::new(&state).admin_login(&request.email, &request.password)?;
    Ok(Json(TokenResponse::new(token)))
}
