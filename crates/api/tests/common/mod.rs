#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use influence_api::auth::jwt::{generate_access_token, JwtConfig};
use influence_api::config::{ServerConfig, StoreBackend};
use influence_api::router::build_app_router;
use influence_api::state::AppState;
use influence_core::memory::{InMemoryLeadStore, InMemoryTemplateStore};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        seed_default_templates: false,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// The full application router over fresh in-memory stores.
pub fn build_test_app() -> Router {
    let config = test_config();
    let state = AppState::new(
        config.clone(),
        Arc::new(InMemoryLeadStore::new()),
        Arc::new(InMemoryTemplateStore::new()),
    );
    build_app_router(state, &config)
}

/// A valid bearer token for `account_id`.
pub fn token_for(account_id: i64) -> String {
    generate_access_token(account_id, &test_config().jwt).expect("token generation should succeed")
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &Router, uri: &str, account_id: i64) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token_for(account_id)))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn json_auth(
    app: &Router,
    method: Method,
    uri: &str,
    account_id: i64,
    body: Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", token_for(account_id)))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(app: &Router, uri: &str, account_id: i64, body: Value) -> Response<Body> {
    json_auth(app, Method::POST, uri, account_id, body).await
}

pub async fn put_json_auth(app: &Router, uri: &str, account_id: i64, body: Value) -> Response<Body> {
    json_auth(app, Method::PUT, uri, account_id, body).await
}

pub async fn delete_auth(app: &Router, uri: &str, account_id: i64) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token_for(account_id)))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a lead for `account_id` and return its id.
pub async fn create_lead(app: &Router, account_id: i64, brand: &str) -> i64 {
    let response = post_json_auth(
        app,
        "/api/leads",
        account_id,
        serde_json::json!({
            "brandName": brand,
            "collaborationType": "Instagram Reel",
            "budgetRange": "$800-1,200"
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["lead"]["id"].as_i64().unwrap()
}
