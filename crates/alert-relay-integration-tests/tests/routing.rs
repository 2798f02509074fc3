//! Integration tests for payload layouts and their routes

mod common;

use alert_relay_api::{create_router, ServiceConfig};
use alert_relay_core::PayloadLayout;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{create_test_app_state, create_test_router, relay_request, response_message};
use serde_json::json;
use tower::ServiceExt;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Verify that the message layout interpolates dotted paths before forwarding
///
/// Subscripts are not part of a template path, so `$.items[0]` interpolates
/// `$.items` and keeps `[0]` as text.
#[tokio::test]
async fn test_message_layout_interpolates_and_forwards() {
    // Arrange
    let destination = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "text": "value is v and v again",
            "first": "first[0] only"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&destination)
        .await;

    let rules = json!({
        "webhookUrl": format!("{}/chat", destination.uri()),
        "text": "value is $.x and $.x again",
        "first": "$.items[0] only"
    });
    let payload = json!({
        "x": "v",
        "items": ["first"],
        "message": rules.to_string()
    });

    // Act
    let response = create_test_router()
        .oneshot(relay_request("/webhook/message", &payload, None))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
}

/// Verify that a message that is not valid JSON is a server error
#[tokio::test]
async fn test_message_layout_rejects_undecodable_message() {
    let payload = json!({ "message": "{ not json" });

    let response = create_test_router()
        .oneshot(relay_request("/webhook/message", &payload, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response_message(response)
        .await
        .starts_with("Internal Server Error: invalid message payload"));
}

/// Verify that every alert is forwarded to its own destination
#[tokio::test]
async fn test_alerts_layout_fans_out_per_alert() {
    // Arrange
    let destination = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/first"))
        .and(body_json(json!({ "hosts": "web-1, web-2" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&destination)
        .await;
    Mock::given(method("POST"))
        .and(path("/second"))
        .and(body_json(json!({ "pair": "1, 2" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&destination)
        .await;

    let payload = json!({
        "x": 1,
        "y": 2,
        "alerts": [
            {
                "labels": {
                    "alertname": "Down",
                    "webhookUrl": format!("{}/first", destination.uri()),
                    "hosts": "$.alerts[*].annotations.host"
                },
                "annotations": { "host": "web-1" }
            },
            {
                "labels": {
                    "webhookUrl": format!("{}/second", destination.uri()),
                    "pair": "$.x,$.y"
                },
                "annotations": { "host": "web-2" }
            }
        ]
    });

    // Act
    let response = create_test_router()
        .oneshot(relay_request("/webhook/alerts", &payload, None))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_message(response).await, "ok");
}

/// Verify that one failing alert fails the whole request after all are sent
#[tokio::test]
async fn test_alerts_layout_reports_failure_of_any_alert() {
    // Arrange
    let destination = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&destination)
        .await;
    Mock::given(method("POST"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&destination)
        .await;

    let payload = json!({
        "alerts": [
            { "labels": { "webhookUrl": format!("{}/down", destination.uri()) } },
            { "labels": { "webhookUrl": format!("{}/ok", destination.uri()) } }
        ]
    });

    // Act
    let response = create_test_router()
        .oneshot(relay_request("/webhook/alerts", &payload, None))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response_message(response).await,
        "Internal Server Error: Failed to send alert: Bad Gateway"
    );
}

/// Verify that the default endpoint follows the configured layout
#[tokio::test]
async fn test_default_endpoint_uses_configured_layout() {
    // Arrange
    let destination = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&destination)
        .await;

    let mut config = ServiceConfig::default();
    config.relay.default_layout = PayloadLayout::Alerts;
    let app = create_router(create_test_app_state(config));

    let payload = json!({
        "alerts": [{ "labels": { "webhookUrl": destination.uri() } }]
    });

    // Act
    let response = app
        .oneshot(relay_request("/webhook", &payload, None))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
}

/// Verify that non-POST methods are refused on every relay route
#[tokio::test]
async fn test_non_post_methods_return_405() {
    for (verb, uri) in [("GET", "/webhook"), ("PUT", "/webhook/alerts"), ("DELETE", "/webhook/message")] {
        let request = Request::builder()
            .method(verb)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = create_test_router().oneshot(request).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{verb} {uri}"
        );
        assert_eq!(response_message(response).await, "Method Not Allowed");
    }
}

/// Verify that a POST without a body is rejected
#[tokio::test]
async fn test_missing_body_returns_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/webhook/alerts")
        .body(Body::empty())
        .unwrap();

    let response = create_test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_message(response).await, "Request body is required");
}

/// Verify that unknown layout names are not found
#[tokio::test]
async fn test_unknown_layout_returns_404() {
    let response = create_test_router()
        .oneshot(relay_request("/webhook/labels", &json!({}), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response_message(response).await,
        "Unknown payload layout: labels"
    );
}
