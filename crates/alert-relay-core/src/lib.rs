//! # Alert-Relay Core
//!
//! Core logic for the Alert-Relay webhook adapter.
//!
//! An inbound alert notification (an Alertmanager-style webhook payload)
//! carries its own routing instructions: a destination `webhookUrl` and a set
//! of per-field extraction rules. This crate turns those rules into the flat
//! JSON body that gets forwarded to the destination.
//!
//! ## Architecture
//!
//! - [`layout`] knows where the rules live inside a payload and extracts one
//!   [`RelayTarget`] per destination.
//! - [`resolver`] evaluates each rule against the full inbound document and
//!   produces [`ResolvedParams`].
//!
//! Neither module performs I/O; the HTTP surface lives in `alert-relay-api`.
//!
//! ## Usage
//!
//! ```rust
//! use alert_relay_core::{FieldResolver, PayloadLayout};
//! use serde_json::json;
//!
//! let body = json!({
//!     "status": "firing",
//!     "commonLabels": {
//!         "webhookUrl": "https://hooks.example.com/alert",
//!         "alertname": "HighLatency",
//!         "text": "status: ,$.status",
//!     }
//! });
//!
//! let layout = PayloadLayout::CommonLabels;
//! let targets = layout.extract_targets(&body).unwrap();
//! let resolver = FieldResolver::new(layout.resolution_mode());
//! let params = resolver.resolve(&targets[0].rules, &body).unwrap();
//!
//! assert_eq!(params["text"], "status: firing");
//! assert!(!params.contains_key("alertname"));
//! ```

pub mod error;
pub mod layout;
pub mod resolver;

pub use error::{LayoutError, ResolveError};
pub use layout::{PayloadLayout, RelayTarget};
pub use resolver::{FieldResolver, ResolutionMode};

/// Ordered rule map as found in the payload: output field name to rule value.
///
/// Values are usually strings; other JSON values are treated as literals.
pub type RuleSet = serde_json::Map<String, serde_json::Value>;

/// Ordered map of output field name to resolved value.
///
/// JSON-encoded, this is the body of the forwarded request.
pub type ResolvedParams = serde_json::Map<String, serde_json::Value>;

/// Control field holding the destination URL.
pub const WEBHOOK_URL_FIELD: &str = "webhookUrl";

/// Rule-map keys with fixed meaning that are never forwarded.
pub const RESERVED_FIELDS: [&str; 3] = ["alertname", "instance", WEBHOOK_URL_FIELD];

/// Returns `true` when `field` is a control field excluded from resolution.
pub fn is_reserved_field(field: &str) -> bool {
    RESERVED_FIELDS.contains(&field)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
