use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::admin_auth;
use shared_utils::AppState;

use crate::handlers;

/// Doctor management and dashboard routes, mounted under `/api/admin`.
pub fn admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/add-doctor", post(handlers::add_doctor))
        .route("/all-doctors", get(handlers::all_doctors))
        .route("/change-availability", post(handlers::change_availability))
        .route("/delete-doctor", post(handlers::delete_doctor))
        .route("/dashboard", get(handlers::admin_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth))
        .with_state(state)
}
