use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_utils::extractor::doctor_auth;
use shared_utils::AppState;

use crate::handlers;

/// Directory and doctor panel routes, mounted under `/api/doctor`.
pub fn doctor_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/list", get(handlers::list_doctors))
        .route("/{doctor_id}/slots", get(handlers::doctor_slots));

    let protected_routes = Router::new()
        .route("/profile", get(handlers::doctor_profile))
        .route("/update-profile", post(handlers::update_doctor_profile))
        .route("/change-availability", post(handlers::change_availability))
        .route("/dashboard", get(handlers::doctor_dashboard))
        .route("/delete-profile", delete(handlers::delete_doctor_profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), doctor_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
