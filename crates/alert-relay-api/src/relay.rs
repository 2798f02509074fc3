//! The relay pipeline behind every relay endpoint.
//!
//! 1. Reject anything but `POST` (405)
//! 2. Require a JSON body (400 when empty or `null`, 500 when unparseable)
//! 3. Extract relay targets for the layout (400 when `webhookUrl` or
//!    `message` is missing)
//! 4. Resolve every target's rules against the full body
//! 5. Forward every target and wait for all of them
//!
//! Only when every forward succeeds is the request answered with
//! `{ "message": "ok" }`. Otherwise the first failure, in payload order,
//! determines the response.

use crate::{
    errors::RelayError,
    forwarder::{ForwardError, ForwardRequest},
    responses::MessageResponse,
    AppState,
};
use alert_relay_core::{FieldResolver, PayloadLayout};
use axum::http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode};
use bytes::Bytes;
use futures::future::join_all;
use serde_json::Value;
use std::time::Instant;
use tracing::{info, instrument};

/// Run the relay pipeline for one inbound request and record its outcome.
#[instrument(skip(state, headers, body), fields(layout = %layout, body_size = body.len()))]
pub async fn relay_alert(
    state: &AppState,
    layout: PayloadLayout,
    method: &Method,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<MessageResponse, RelayError> {
    let result = process(state, layout, method, headers, body).await;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => e.status_code(),
    };
    state.metrics.record_request(layout, status);

    result
}

async fn process(
    state: &AppState,
    layout: PayloadLayout,
    method: &Method,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<MessageResponse, RelayError> {
    if method != Method::POST {
        return Err(RelayError::MethodNotAllowed {
            method: method.to_string(),
        });
    }

    let document = parse_body(body)?;
    let targets = layout.extract_targets(&document)?;
    let resolver = FieldResolver::new(layout.resolution_mode());
    let authorization = headers.get(AUTHORIZATION).cloned();

    let requests = targets
        .into_iter()
        .map(|target| {
            let params = resolver.resolve(&target.rules, &document)?;
            Ok(ForwardRequest {
                url: target.webhook_url,
                method: method.clone(),
                authorization: authorization.clone(),
                body: params,
            })
        })
        .collect::<Result<Vec<_>, RelayError>>()?;

    let target_count = requests.len();
    let outcomes = join_all(
        requests
            .into_iter()
            .map(|request| forward_one(state, request)),
    )
    .await;
    outcomes.into_iter().collect::<Result<Vec<()>, _>>()?;

    info!(target_count, "Relayed alert to all destinations");
    Ok(MessageResponse::ok())
}

/// Parse the inbound body, treating an empty body or JSON `null` as missing.
pub(crate) fn parse_body(body: &Bytes) -> Result<Value, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RelayError::MissingBody);
    }

    let document: Value =
        serde_json::from_slice(body).map_err(|e| RelayError::InvalidJson {
            message: e.to_string(),
        })?;

    if document.is_null() {
        return Err(RelayError::MissingBody);
    }

    Ok(document)
}

async fn forward_one(state: &AppState, request: ForwardRequest) -> Result<(), ForwardError> {
    let start = Instant::now();
    let result = state.forwarder.forward(request).await;
    state.metrics.record_forward(result.is_ok(), start.elapsed());
    result
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
