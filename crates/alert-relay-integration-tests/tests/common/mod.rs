//! Common test utilities for alert-relay-api integration tests
//!
//! This module provides:
//! - Router construction with the production HTTP forwarder
//! - Request builders for relay calls
//! - Response body helpers

use alert_relay_api::{
    create_router, AppState, DefaultHealthChecker, ForwardingConfig, HttpForwarder, RelayMetrics,
    ServiceConfig,
};
use axum::{
    body::{to_bytes, Body},
    http::Request,
    response::Response,
    Router,
};
use serde_json::Value;
use std::sync::Arc;

/// Build application state that forwards over real HTTP.
#[allow(dead_code)]
pub fn create_test_app_state(config: ServiceConfig) -> AppState {
    let forwarder = HttpForwarder::new(&ForwardingConfig {
        timeout_seconds: 5,
        ..ForwardingConfig::default()
    })
    .expect("HTTP client should build");

    AppState::new(
        config,
        Arc::new(forwarder),
        Arc::new(DefaultHealthChecker),
        RelayMetrics::new().expect("metrics should register"),
    )
}

/// Router with the default configuration.
#[allow(dead_code)]
pub fn create_test_router() -> Router {
    create_router(create_test_app_state(ServiceConfig::default()))
}

/// `POST` a JSON body, optionally with an `authorization` header.
#[allow(dead_code)]
pub fn relay_request(uri: &str, body: &Value, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// Read the `message` field of a relay response.
#[allow(dead_code)]
pub async fn response_message(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    body["message"]
        .as_str()
        .expect("response should carry a message")
        .to_string()
}
