//! Error types for the HTTP service

use crate::{forwarder::ForwardError, responses::MessageResponse};
use alert_relay_core::{LayoutError, ResolveError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

/// Relay handler errors with HTTP status code mapping
///
/// Every variant maps to a status code and a `{ "message": ... }` body:
///
/// - `400 Bad Request`: the payload is missing something required to route it
///   (body, `message`, `webhookUrl`); nothing is forwarded
/// - `404 Not Found`: the per-layout route names an unknown layout
/// - `405 Method Not Allowed`: anything other than `POST`
/// - `500 Internal Server Error`: the payload could not be processed or the
///   destination rejected the forwarded alert; the body carries
///   `Internal Server Error: <detail>`
///
/// No variant is retried by the relay itself.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Request method other than `POST`
    #[error("Method Not Allowed")]
    MethodNotAllowed { method: String },

    /// Empty request body, or a body that is JSON `null`
    #[error("Request body is required")]
    MissingBody,

    /// Request body is not valid JSON
    #[error("{message}")]
    InvalidJson { message: String },

    /// Routing configuration missing from or malformed in the payload
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A rule could not be evaluated
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The destination rejected the alert or could not be reached
    #[error(transparent)]
    Forward(#[from] ForwardError),

    /// `/webhook/{layout}` with a layout name that does not exist
    #[error("Unknown payload layout: {name}")]
    UnknownLayout { name: String },
}

impl RelayError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingBody => StatusCode::BAD_REQUEST,
            Self::Layout(e) if e.is_missing_field() => StatusCode::BAD_REQUEST,
            Self::UnknownLayout { .. } => StatusCode::NOT_FOUND,
            Self::InvalidJson { .. } | Self::Layout(_) | Self::Resolve(_) | Self::Forward(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the client.
    ///
    /// Server errors are prefixed with `Internal Server Error: `.
    pub fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            format!("Internal Server Error: {}", self)
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.client_message();

        if status.is_server_error() {
            error!(status = %status, error = %self, "Relay request failed");
        } else {
            warn!(status = %status, error = %self, "Relay request rejected");
        }

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Failed to load configuration: {message}")]
    Load { message: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
