use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_utils::extractor::patient_auth;
use shared_utils::AppState;

use crate::handlers;

/// Patient account and payment routes, mounted under `/api/user`.
pub fn patient_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get-profile", get(handlers::get_profile))
        .route("/update-profile", post(handlers::update_profile))
        .route("/delete-profile", delete(handlers::delete_profile))
        .route("/payment-razorpay", post(handlers::payment_razorpay))
        .route("/verify-razorpay", post(handlers::verify_razorpay))
        .route_layer(middleware::from_fn_with_state(state.clone(), patient_auth))
        .with_state(state)
}
