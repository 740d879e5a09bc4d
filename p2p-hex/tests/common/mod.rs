//! Shared helpers for HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, Response},
};
use exchange_rates::StaticRates;
use http_body_util::BodyExt;
use p2p_hex::{ExchangeService, inbound::HttpServer};
use p2p_repo::SqliteRepo;

/// Test server over in-memory SQLite and the built-in rate table.
pub async fn create_test_server(requests_per_minute: u32) -> HttpServer<SqliteRepo> {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = ExchangeService::new(repo, Arc::new(StaticRates::builtin()));
    HttpServer::with_rate_limit(service, requests_per_minute)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_from(uri: &str, client: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Forwarded-For", client)
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
