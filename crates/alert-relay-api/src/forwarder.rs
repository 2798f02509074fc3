//! Outbound delivery of resolved alert bodies.
//!
//! The relay handler builds one [`ForwardRequest`] per relay target and hands
//! it to an [`AlertForwarder`]. [`HttpForwarder`] is the production
//! implementation; tests substitute their own.

use crate::config::ForwardingConfig;
use alert_relay_core::ResolvedParams;
use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Method, StatusCode, Url,
};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// A resolved alert ready to be sent to its destination.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    /// Destination URL, verbatim from the payload's `webhookUrl`.
    pub url: String,

    /// Method of the inbound request; reused for the outbound one.
    pub method: Method,

    /// Inbound `authorization` header, passed through unchanged.
    pub authorization: Option<HeaderValue>,

    /// JSON body of the outbound request.
    pub body: ResolvedParams,
}

/// Errors raised while delivering a resolved alert.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The destination answered with a non-2xx status.
    #[error("Failed to send alert: {status_text}")]
    Rejected { status: u16, status_text: String },

    /// The request could not be sent or no response was received.
    #[error("Failed to send alert: {message}")]
    Transport { message: String },

    /// The `webhookUrl` is not an absolute URL.
    #[error("Invalid webhookUrl '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl ForwardError {
    /// Build a [`ForwardError::Rejected`] from a response status.
    ///
    /// The status text is the canonical reason phrase, falling back to the
    /// numeric code for unregistered statuses.
    pub fn rejected(status: StatusCode) -> Self {
        Self::Rejected {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_u16().to_string()),
        }
    }
}

/// Delivers resolved alert bodies to their destinations.
#[async_trait]
pub trait AlertForwarder: Send + Sync {
    /// Send one request; succeed only on a 2xx response.
    async fn forward(&self, request: ForwardRequest) -> Result<(), ForwardError>;
}

/// [`AlertForwarder`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
}

impl HttpForwarder {
    /// Build a forwarder with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Transport`] when the HTTP client cannot be
    /// initialised (for example, no TLS backend is available).
    pub fn new(config: &ForwardingConfig) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ForwardError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AlertForwarder for HttpForwarder {
    #[instrument(skip(self, request), fields(url = %request.url, method = %request.method))]
    async fn forward(&self, request: ForwardRequest) -> Result<(), ForwardError> {
        let url = Url::parse(&request.url).map_err(|e| ForwardError::InvalidUrl {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        let body = serde_json::to_vec(&request.body).map_err(|e| ForwardError::Transport {
            message: e.to_string(),
        })?;

        let mut builder = self
            .client
            .request(request.method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body);

        if let Some(authorization) = request.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        let response = builder.send().await.map_err(|e| ForwardError::Transport {
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Destination rejected forwarded alert");
            return Err(ForwardError::rejected(status));
        }

        debug!(status = %status, "Forwarded alert delivered");
        Ok(())
    }
}

#[cfg(test)]
#[path = "forwarder_tests.rs"]
mod tests;
