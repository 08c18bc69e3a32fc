use std::sync::Arc;

use axum::{routing::get, Router};

use admin_cell::router::admin_routes;
use appointment_cell::router::{
    admin_appointment_routes, doctor_appointment_routes, patient_appointment_routes,
};
use auth_cell::router::{admin_auth_routes, doctor_auth_routes, patient_auth_routes};
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use shared_utils::AppState;

/// One prefix per principal kind. Each cell contributes the routes it owns
/// under that prefix.
pub fn create_router(state: Arc<AppState>) -> Router {
    let user = Router::new()
        .merge(patient_auth_routes(state.clone()))
        .merge(patient_routes(state.clone()))
        .merge(patient_appointment_routes(state.clone()));

    let doctor = Router::new()
        .merge(doctor_auth_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(doctor_appointment_routes(state.clone()));

    let admin = Router::new()
        .merge(admin_auth_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .merge(admin_appointment_routes(state));

    Router::new()
        .route("/", get(|| async { "API Working" }))
        .nest("/api/user", user)
        .nest("/api/doctor", doctor)
        .nest("/api/admin", admin)
}
