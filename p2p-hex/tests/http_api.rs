//! End-to-end HTTP tests over in-memory SQLite and the built-in rate table.

mod common;

use axum::http::StatusCode;
use tower::ServiceExt;

use common::{create_test_server, get, json_body, post_json};

async fn app() -> axum::Router {
    create_test_server(1_000).await.router()
}

// ─────────────────────────────────────────────────────────────────────────────
// Health
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_reports_database_up() {
    let response = app().await.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "up");
}

// ─────────────────────────────────────────────────────────────────────────────
// Wallet
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_balance_creates_then_adds() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/wallet/update-balance",
            r#"{"amount": 50, "currency": "usd"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["currency"], "USD");
    assert_eq!(json["balance"].as_f64(), Some(50.0));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/wallet/update-balance",
            r#"{"amount": 25, "currency": "USD"}"#,
        ))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["balance"].as_f64(), Some(75.0));

    let response = app.clone().oneshot(get("/api/wallet/balances")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let wallets = json.as_array().unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0]["currency"], "USD");
    assert_eq!(wallets[0]["balance"].as_f64(), Some(75.0));
}

#[tokio::test]
async fn test_update_balance_rejects_bad_input_with_400() {
    let app = app().await;

    for body in [
        r#"{"amount": "lots", "currency": "USD"}"#,
        r#"{"amount": 10}"#,
        r#"{"amount": 0, "currency": "USD"}"#,
        r#"{"amount": -5, "currency": "USD"}"#,
        r#"{"amount": 10, "currency": "DOLLARS"}"#,
        r#"not json"#,
    ] {
        let response = app
            .clone()
            .oneshot(post_json("/api/wallet/update-balance", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");

        let json = json_body(response).await;
        assert_eq!(json["code"], 400);
        assert!(json["error"].is_string());
    }

    let response = app.oneshot(get("/api/wallet/balances")).await.unwrap();
    assert_eq!(json_body(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_verify_wallet() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(get("/api/wallet/verify/eur"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["exists"], false);
    assert!(json.get("wallet").is_none());

    app.clone()
        .oneshot(post_json(
            "/api/wallet/update-balance",
            r#"{"amount": 10, "currency": "EUR"}"#,
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/wallet/verify/EUR"))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["exists"], true);
    assert_eq!(json["wallet"]["currency"], "EUR");

    let response = app.oneshot(get("/api/wallet/verify/E1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ─────────────────────────────────────────────────────────────────────────────
// Rates and quotes
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rates_passthrough_shape() {
    let response = app().await.oneshot(get("/api/rates/usd")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["result"], "success");
    assert_eq!(json["base_code"], "USD");
    assert_eq!(json["conversion_rates"]["USD"].as_f64(), Some(1.0));
    assert_eq!(json["conversion_rates"]["EUR"].as_f64(), Some(0.92));
}

#[tokio::test]
async fn test_rates_unknown_base_is_400() {
    let response = app().await.oneshot(get("/api/rates/XYZ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote() {
    let response = app()
        .await
        .oneshot(post_json(
            "/api/quote",
            r#"{"from_currency": "usd", "to_currency": "EUR", "amount": 100}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["from_currency"], "USD");
    assert_eq!(json["to_currency"], "EUR");
    assert_eq!(json["rate"].as_f64(), Some(0.92));
    assert_eq!(json["base_amount"].as_f64(), Some(92.0));
    assert_eq!(json["fee"].as_f64(), Some(0.18));
    assert_eq!(json["total"].as_f64(), Some(92.18));
}

#[tokio::test]
async fn test_quote_rejects_non_positive_amount() {
    let response = app()
        .await
        .oneshot(post_json(
            "/api/quote",
            r#"{"from_currency": "USD", "to_currency": "EUR", "amount": 0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ─────────────────────────────────────────────────────────────────────────────
// Signup
// ─────────────────────────────────────────────────────────────────────────────

const SIGNUP: &str =
    r#"{"firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com", "password": "correct horse"}"#;

#[tokio::test]
async fn test_signup_created_then_conflict() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/signup", SIGNUP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert!(json["userId"].is_string());
    assert_eq!(json["message"], "User created successfully");

    let response = app
        .oneshot(post_json("/api/auth/signup", SIGNUP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["code"], 409);
}

#[tokio::test]
async fn test_signup_missing_fields_is_400() {
    let response = app()
        .await
        .oneshot(post_json(
            "/api/auth/signup",
            r#"{"firstName": "Ada", "email": "ada@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ─────────────────────────────────────────────────────────────────────────────
// Documentation
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_openapi_document_served() {
    let response = app()
        .await
        .oneshot(get("/api-docs/openapi.json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["paths"]["/api/quote"].is_object());
}
