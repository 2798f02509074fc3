//! Payload layouts: where routing rules live inside an inbound alert.
//!
//! Alert-Relay accepts three payload shapes. They differ only in where the
//! rule map (and with it the `webhookUrl` control field) is found:
//!
//! | Layout                          | Rule map location                          | Mode                 |
//! |---------------------------------|--------------------------------------------|----------------------|
//! | [`PayloadLayout::CommonLabels`] | `commonLabels`                             | segments, no separator |
//! | [`PayloadLayout::Message`]      | JSON object encoded in the `message` string | template             |
//! | [`PayloadLayout::Alerts`]       | `labels` of every element of `alerts`      | segments, `", "`     |
//!
//! Rules are always evaluated against the full inbound body, whatever the
//! layout.

use crate::{LayoutError, ResolutionMode, RuleSet, WEBHOOK_URL_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

// ============================================================================
// RelayTarget
// ============================================================================

/// One destination extracted from a payload, with the rules that build its body.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayTarget {
    /// Literal destination URL taken from the `webhookUrl` control field.
    pub webhook_url: String,

    /// The rule map the URL was found in, control fields included.
    pub rules: RuleSet,
}

impl RelayTarget {
    /// Build a target from a rule map, requiring a non-empty `webhookUrl`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MissingWebhookUrl`] when the field is absent,
    /// empty, or not a string.
    pub fn from_rules(rules: &RuleSet) -> Result<Self, LayoutError> {
        let webhook_url = rules
            .get(WEBHOOK_URL_FIELD)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .ok_or(LayoutError::MissingWebhookUrl)?;

        Ok(Self {
            webhook_url: webhook_url.to_string(),
            rules: rules.clone(),
        })
    }
}

// ============================================================================
// PayloadLayout
// ============================================================================

/// Where the rule map is located in an inbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadLayout {
    /// Rules in the top-level `commonLabels` object.
    #[default]
    CommonLabels,

    /// Rules in a JSON object encoded in the top-level `message` string.
    Message,

    /// Rules in the `labels` of every element of the `alerts` array.
    Alerts,
}

impl PayloadLayout {
    /// Every supported layout.
    pub const ALL: [PayloadLayout; 3] = [Self::CommonLabels, Self::Message, Self::Alerts];

    /// Configuration name (`snake_case`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CommonLabels => "common_labels",
            Self::Message => "message",
            Self::Alerts => "alerts",
        }
    }

    /// URL path segment (`kebab-case`) used by per-layout routes.
    pub fn route_segment(&self) -> &'static str {
        match self {
            Self::CommonLabels => "common-labels",
            Self::Message => "message",
            Self::Alerts => "alerts",
        }
    }

    /// The resolution mode rules in this layout are written for.
    pub fn resolution_mode(&self) -> ResolutionMode {
        match self {
            Self::CommonLabels => ResolutionMode::concatenated(),
            Self::Message => ResolutionMode::Template,
            Self::Alerts => ResolutionMode::comma_separated(),
        }
    }

    /// Locate every relay target in `body`.
    ///
    /// `common_labels` and `message` payloads yield exactly one target;
    /// `alerts` payloads yield one target per alert, in array order.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::MissingMessage`] when a `message` payload has no
    ///   (or an empty) `message` field
    /// - [`LayoutError::InvalidMessage`] when `message` does not decode to a
    ///   JSON object
    /// - [`LayoutError::MissingWebhookUrl`] when the rule map is missing or
    ///   lacks `webhookUrl`; for `alerts`, when the array is missing, empty,
    ///   or any alert lacks it
    pub fn extract_targets(&self, body: &Value) -> Result<Vec<RelayTarget>, LayoutError> {
        let targets = match self {
            Self::CommonLabels => {
                let rules = body
                    .get("commonLabels")
                    .and_then(Value::as_object)
                    .ok_or(LayoutError::MissingWebhookUrl)?;
                vec![RelayTarget::from_rules(rules)?]
            }
            Self::Message => {
                let rules = decode_message(body)?;
                vec![RelayTarget::from_rules(&rules)?]
            }
            Self::Alerts => {
                let alerts = body
                    .get("alerts")
                    .and_then(Value::as_array)
                    .filter(|alerts| !alerts.is_empty())
                    .ok_or(LayoutError::MissingWebhookUrl)?;

                alerts
                    .iter()
                    .map(|alert| {
                        alert
                            .get("labels")
                            .and_then(Value::as_object)
                            .ok_or(LayoutError::MissingWebhookUrl)
                            .and_then(RelayTarget::from_rules)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        debug!(
            layout = %self,
            target_count = targets.len(),
            "Extracted relay targets"
        );

        Ok(targets)
    }
}

/// Decode the rule object carried in the `message` field.
///
/// A string is parsed as JSON; an object is accepted as-is.
fn decode_message(body: &Value) -> Result<RuleSet, LayoutError> {
    match body.get("message") {
        None | Some(Value::Null) => Err(LayoutError::MissingMessage),
        Some(Value::String(encoded)) if encoded.is_empty() => Err(LayoutError::MissingMessage),
        Some(Value::String(encoded)) => {
            let decoded: Value =
                serde_json::from_str(encoded).map_err(|e| LayoutError::InvalidMessage {
                    message: e.to_string(),
                })?;
            match decoded {
                Value::Object(rules) => Ok(rules),
                _ => Err(LayoutError::InvalidMessage {
                    message: "message must decode to a JSON object".to_string(),
                }),
            }
        }
        Some(Value::Object(rules)) => Ok(rules.clone()),
        Some(_) => Err(LayoutError::InvalidMessage {
            message: "message must be a JSON-encoded string".to_string(),
        }),
    }
}

impl fmt::Display for PayloadLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PayloadLayout {
    type Err = String;

    /// Accepts both the configuration name and the route segment.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.as_str() == s || layout.route_segment() == s)
            .ok_or_else(|| format!("Unknown payload layout: {}", s))
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
