use std::sync::Arc;

use axum::{routing::post, Router};

use shared_utils::AppState;

use crate::handlers;

/// `/register` and `/login` under `/api/user`.
pub fn patient_auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(handlers::register_patient))
        .route("/login", post(handlers::patient_login))
        .with_state(state)
}

pub fn doctor_auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(handlers::doctor_login))
        .with_state(state)
}

pub fn admin_auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(handlers::admin_login))
        .with_state(state)
}
