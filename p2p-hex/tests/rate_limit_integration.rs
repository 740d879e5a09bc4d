//! Integration tests for rate limiting middleware.
//!
//! These tests verify the HTTP-level behavior of rate limiting,
//! including 429 responses and proper integration with the middleware stack.

mod common;

use axum::http::StatusCode;
use tower::ServiceExt;

use common::{create_test_server, get, get_from, json_body};

#[tokio::test]
async fn test_rate_limiting_returns_429_when_exceeded() {
    // Create server with only 3 requests allowed per minute
    let server = create_test_server(3).await;
    let app = server.router();

    for i in 1..=3 {
        let response = app
            .clone()
            .oneshot(get_from("/api/wallet/balances", "198.51.100.1"))
            .await
            .unwrap();
        assert_ne!(
            response.status(),
            StatusCode::TOO_MANY_REQUESTS,
            "Request {} should not be rate limited (quota not yet exceeded)",
            i
        );
    }

    // 4th request should be rate limited
    let response = app
        .clone()
        .oneshot(get_from("/api/wallet/balances", "198.51.100.1"))
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::TOO_MANY_REQUESTS,
        "Request should be rate limited after exceeding quota"
    );

    let json = json_body(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Rate limit exceeded")
    );
    assert!(json["retry_after_seconds"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_rate_limiting_health_endpoint_bypassed() {
    // Create server with only 1 request allowed per minute
    let server = create_test_server(1).await;
    let app = server.router();

    // Health endpoint bypasses rate limiting entirely
    for _ in 0..10 {
        let response = app.clone().oneshot(get("/health")).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Health endpoint should not be rate limited"
        );
    }
}

#[tokio::test]
async fn test_rate_limiting_per_client_isolation() {
    let server = create_test_server(1).await;
    let app = server.router();

    let response = app
        .clone()
        .oneshot(get_from("/api/wallet/balances", "198.51.100.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_from("/api/wallet/balances", "198.51.100.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different client has its own quota
    let response = app
        .clone()
        .oneshot(get_from("/api/wallet/balances", "198.51.100.2, 10.0.0.1"))
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Second client should have its own quota"
    );
}

#[tokio::test]
async fn test_rate_limiting_anonymous_clients_share_quota() {
    let server = create_test_server(1).await;
    let app = server.router();

    let response = app.clone().oneshot(get("/api/wallet/balances")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/rates/USD")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("application/json"));
}
