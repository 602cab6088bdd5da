//! Tests for bearer-token enforcement on protected routes.
//!
//! These run against the full router with a lazily connecting pool, so the
//! auth middleware can be exercised without a live database. None of the
//! requests here reach a handler that queries.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use dormex_api::auth::jwt::generate_access_token;

async fn status_and_body(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn missing_authorization_header_returns_401() {
    let app = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/matches/my")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, json) = status_and_body(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn non_bearer_authorization_returns_401() {
    let app = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/matches/my")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, json) = status_and_body(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_returns_401() {
    let app = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/listings/my")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, json) = status_and_body(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid or expired token");
}

#[tokio::test]
async fn token_signed_with_wrong_secret_returns_401() {
    let app = common::build_test_app(common::lazy_pool());

    let wrong = dormex_api::auth::jwt::JwtConfig {
        secret: "some-other-secret-entirely".to_string(),
        access_token_expiry_mins: 60,
    };
    let token = generate_access_token("uid-1", "resident@example.edu", None, &wrong).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/transactions/my")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, json) = status_and_body(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}
