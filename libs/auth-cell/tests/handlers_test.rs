use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_cell::router::{admin_auth_routes, doctor_auth_routes, patient_auth_routes};
use shared_models::Role;
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::{TestContext, TEST_PASSWORD};

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn register_then_login() {
    let ctx = TestContext::new();

    let (status, json) = post(
        patient_auth_routes(ctx.state.clone()),
        "/register",
        json!({ "name": "Jane", "email": "jane@example.com", "password": "longpassword" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (status, json) = post(
        patient_auth_routes(ctx.state.clone()),
        "/login",
        json!({ "email": "jane@example.com", "password": "longpassword" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session = validate_token(json["token"].as_str().unwrap(), &ctx.config.jwt_secret).unwrap();
    assert_eq!(session.role, Role::Patient);
}

#[tokio::test]
async fn register_with_missing_fields() {
    let ctx = TestContext::new();
    let (status, json) = post(
        patient_auth_routes(ctx.state.clone()),
        "/register",
        json!({ "email": "jane@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Missing Details");
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let ctx = TestContext::new();
    ctx.seed_patient("Jane", "jane@example.com").await;

    let (status, json) = post(
        patient_auth_routes(ctx.state.clone()),
        "/login",
        json!({ "email": "jane@example.com", "password": "not-it" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Invalid credentials");
}

#[tokio::test]
async fn doctor_login_returns_doctor_token() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Richard James", "richard@clinic.com").await;

    let (status, json) = post(
        doctor_auth_routes(ctx.state.clone()),
        "/login",
        json!({ "email": "richard@clinic.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session = validate_token(json["token"].as_str().unwrap(), &ctx.config.jwt_secret).unwrap();
    assert_eq!(session.principal_id, doctor.id);
    assert_eq!(session.role, Role::Doctor);
}

#[tokio::test]
async fn admin_login() {
    let ctx = TestContext::new();

    let (status, json) = post(
        admin_auth_routes(ctx.state.clone()),
        "/login",
        json!({ "email": ctx.config.admin_email, "password": ctx.config.admin_password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["token"].as_str().is_some());

    let (status, _) = post(
        admin_auth_routes(ctx.state.clone()),
        "/login",
        json!({ "email": ctx.config.admin_email, "password": "nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_without_password_field_is_a_validation_error() {
    let ctx = TestContext::new();
    let (status, json) = post(
        doctor_auth_routes(ctx.state.clone()),
        "/login",
        json!({ "email": "richard@clinic.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("password"));
}
