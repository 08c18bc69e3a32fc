use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::{admin_auth, doctor_auth, patient_auth};
use shared_utils::AppState;

use crate::handlers;

/// Mounted under `/api/user`.
pub fn patient_appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/book-appointment", post(handlers::book_appointment))
        .route("/appointments", get(handlers::list_user_appointments))
        .route("/cancel-appointment", post(handlers::cancel_appointment))
        .route_layer(middleware::from_fn_with_state(state.clone(), patient_auth))
        .with_state(state)
}

/// Mounted under `/api/doctor`.
pub fn doctor_appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/appointments", get(handlers::list_doctor_appointments))
        .route("/cancel-appointment", post(handlers::cancel_appointment))
        .route("/complete-appointment", post(handlers::complete_appointment))
        .route_layer(middleware::from_fn_with_state(state.clone(), doctor_auth))
        .with_state(state)
}

/// Mounted under `/api/admin`.
pub fn admin_appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/appointments", get(handlers::list_all_appointments))
        .route("/cancel-appointment", post(handlers::cancel_appointment))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth))
        .with_state(state)
}
