use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
    Json,
};
use headers::HeaderMapExt;
use serde::de::DeserializeOwned;
use tracing::debug;

use shared_models::error::AppError;
use shared_models::Session;

use crate::headers::{AdminToken, DoctorToken, PatientToken, RoleToken};
use crate::jwt::validate_token;
use crate::state::AppState;

fn not_authorized() -> AppError {
    AppError::Auth("Not Authorized Login Again".to_string())
}

/// Reads the role's token header and returns the session it proves.
pub fn authenticate<T: RoleToken>(headers: &HeaderMap, jwt_secret: &str) -> Result<Session, AppError> {
    let header = headers.typed_get::<T>().ok_or_else(not_authorized)?;

    let session = validate_token(header.token(), jwt_secret).map_err(|e| {
        debug!("Rejected {} token: {}", T::ROLE, e);
        not_authorized()
    })?;

    // A token minted for one role never opens another role's routes.
    if !session.is(T::ROLE) {
        debug!("{} token presented where {} is required", session.role, T::ROLE);
        return Err(not_authorized());
    }

    Ok(session)
}

pub async fn patient_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = authenticate::<PatientToken>(request.headers(), &state.config.jwt_secret)?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

pub async fn doctor_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = authenticate::<DoctorToken>(request.headers(), &state.config.jwt_secret)?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Admin tokens must also name the configured admin email.
pub async fn admin_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = authenticate::<AdminToken>(request.headers(), &state.config.jwt_secret)?;
    if !session.principal_id.eq_ignore_ascii_case(&state.config.admin_email) {
        debug!("Admin token for unknown subject {}", session.principal_id);
        return Err(not_authorized());
    }
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// `Json<T>` whose rejections render as a `ValidationError` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection: JsonRejection| {
                debug!("Rejected request body: {}", rejection.body_text());
                AppError::ValidationError(rejection.body_text())
            })?;
        Ok(Self(value))
    }
}
