#![allow(dead_code)]

use axum::{Router, body::Body, http::Request, response::Response};
use serde::de::DeserializeOwned;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

use stash::{
    app_state::AppState,
    auth::jwt::JwtService,
    config::ExtractionConfig,
    extraction::FirecrawlClient,
    routes::router,
};

pub const JWT_SECRET: &str = "integration-test-secret";

/// Full router with the extraction client pointed at `extraction_url`.
pub fn test_app_with_extraction(pool: Pool<Postgres>, extraction_url: &str) -> Router {
    let extractor = FirecrawlClient::new(&ExtractionConfig {
        api_url: extraction_url.to_string(),
        api_key: "fc-test".to_string(),
        ..ExtractionConfig::default()
    })
    .unwrap();

    router(AppState::new(
        pool,
        Arc::new(extractor),
        JwtService::new(JWT_SECRET),
    ))
}

/// Router whose extraction service is unreachable.
pub fn test_app(pool: Pool<Postgres>) -> Router {
    test_app_with_extraction(pool, "http://127.0.0.1:9")
}

pub fn bearer(user_id: Uuid) -> String {
    let token = JwtService::new(JWT_SECRET).generate_token(user_id).unwrap();
    format!("Bearer {}", token)
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
