//! Integration tests for the HTTP surface.
//!
//! These tests exercise routing, validation, authentication, and webhook
//! signature checks without a live database: the app is built over a lazy
//! pool pointing at an unreachable address, and every assertion here is
//! reachable before any query (or covered by a documented fallback).
//! Repository behavior against real Postgres is covered by the
//! `#[ignore]`d tests in the persistence crate.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{
    admin_request, create_test_app, get_request, json_request, parse_response_body,
    webhook_request, TEST_WEBHOOK_SECRET,
};
use serde_json::json;
use tower::ServiceExt;

// ============================================================================
// Booking validation
// ============================================================================

#[tokio::test]
async fn test_create_booking_rejects_blank_service() {
    let app = create_test_app();
    let request = json_request(
        Method::POST,
        "/api/v1/bookings",
        json!({
            "customer_id": "550e8400-e29b-41d4-a716-446655440000",
            "service": "   ",
            "starts_at": "2099-06-01T10:00:00Z"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_create_booking_rejects_past_start() {
    let app = create_test_app();
    let request = json_request(
        Method::POST,
        "/api/v1/bookings",
        json!({
            "customer_id": "550e8400-e29b-41d4-a716-446655440000",
            "service": "Full groom",
            "starts_at": "2020-01-01T10:00:00Z"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("must be in the future"));
}

#[tokio::test]
async fn test_create_booking_rejects_malformed_body() {
    let app = create_test_app();
    let request = json_request(Method::POST, "/api/v1/bookings", json!({"service": 7}));

    let response = app.oneshot(request).await.unwrap();
    // Missing/mistyped fields fail JSON extraction.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Click-through redirects
// ============================================================================

#[tokio::test]
async fn test_click_through_malformed_id_redirects_to_default() {
    let app = create_test_app();
    let response = app.oneshot(get_request("/r/not-a-uuid")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert_eq!(location, "https://book.test/");
}

// ============================================================================
// Admin authentication
// ============================================================================

#[tokio::test]
async fn test_admin_route_requires_api_key() {
    let app = create_test_app();
    let response = app
        .oneshot(get_request("/api/v1/admin/quota"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_route_rejects_wrong_api_key() {
    let app = create_test_app();
    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/v1/admin/quota")
        .header("X-API-Key", "wrong-key")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_resume_unknown_channel_is_not_found() {
    let app = create_test_app();
    let response = app
        .oneshot(admin_request(
            Method::POST,
            "/api/v1/admin/connections/fax/resume",
        ))
        .await
        .unwrap();

    // Valid key, unknown channel: rejected before any database access.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = parse_response_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("fax"));
}

// ============================================================================
// Provider webhook
// ============================================================================

#[tokio::test]
async fn test_webhook_rejects_missing_signature() {
    let app = create_test_app();
    let request = json_request(
        Method::POST,
        "/api/v1/webhooks/provider",
        json!({"event": "delivered"}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_rejects_bad_signature() {
    let app = create_test_app();
    let request = webhook_request(r#"{"event": "delivered"}"#, "not-the-secret");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_rejects_malformed_payload() {
    let app = create_test_app();
    let request = webhook_request("{not json", TEST_WEBHOOK_SECRET);

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_webhook_acknowledges_unknown_event() {
    let app = create_test_app();
    let request = webhook_request(r#"{"event": "opened"}"#, TEST_WEBHOOK_SECRET);

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["received"], true);
}

// ============================================================================
// Health probes
// ============================================================================

#[tokio::test]
async fn test_liveness_probe() {
    let app = create_test_app();
    let response = app.oneshot(get_request("/api/health/live")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_readiness_probe_without_database() {
    let app = create_test_app();
    let response = app.oneshot(get_request("/api/health/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app();
    let response = app.oneshot(get_request("/api/v1/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
