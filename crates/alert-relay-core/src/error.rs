//! Error types for rule resolution and payload layout extraction.

/// Failure while resolving a single rule.
///
/// Every variant names the output field whose rule failed so that the error
/// can be attributed to the offending key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A `$`-prefixed segment is not a valid JSONPath expression.
    #[error("invalid JSONPath '{path}' for field '{field}': {message}")]
    InvalidPath {
        field: String,
        path: String,
        message: String,
    },
}

impl ResolveError {
    /// Output field whose rule failed.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidPath { field, .. } => field,
        }
    }
}

/// Failure while locating routing configuration inside a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// No usable `webhookUrl` control field was found.
    #[error("webhookUrl is required")]
    MissingWebhookUrl,

    /// The `message` field is absent (message layout only).
    #[error("message is required")]
    MissingMessage,

    /// The `message` field could not be decoded into a rule object.
    #[error("invalid message payload: {message}")]
    InvalidMessage { message: String },
}

impl LayoutError {
    /// Returns `true` for errors caused by a missing required field.
    ///
    /// These are client input errors; everything else is an unexpected
    /// payload failure.
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingWebhookUrl | Self::MissingMessage)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
