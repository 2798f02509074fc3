//! Alert field resolution.
//!
//! A [`FieldResolver`] turns a [`RuleSet`] into [`ResolvedParams`] by
//! evaluating every rule against the inbound alert document. The way a rule
//! string is interpreted depends on the [`ResolutionMode`], which is chosen
//! per payload layout rather than per field:
//!
//! | Mode                        | Rule syntax                                   |
//! |-----------------------------|-----------------------------------------------|
//! | [`ResolutionMode::Segments`] | `literal,$.json.path,literal` (comma segments) |
//! | [`ResolutionMode::Template`] | `text with $.dotted.path inline`               |
//!
//! Control fields ([`RESERVED_FIELDS`](crate::RESERVED_FIELDS)) are skipped
//! in both modes.

pub mod segment;
pub mod stringify;
pub mod template;

use crate::{is_reserved_field, ResolveError, ResolvedParams, RuleSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// ============================================================================
// ResolutionMode
// ============================================================================

/// Strategy used to turn a rule string into its final value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ResolutionMode {
    /// Split the rule on `,`; `$`-prefixed segments are JSONPath queries.
    /// Literal segments and individual matches are joined with `separator`.
    Segments {
        /// Separator placed between consecutive parts.
        separator: String,
    },

    /// Replace each embedded dotted JSONPath (`$.a.b`) in place; multiple
    /// matches of one path are joined with a single space.
    Template,
}

impl ResolutionMode {
    /// Segment mode with parts concatenated directly.
    pub fn concatenated() -> Self {
        Self::Segments {
            separator: String::new(),
        }
    }

    /// Segment mode with parts joined by `", "`.
    pub fn comma_separated() -> Self {
        Self::Segments {
            separator: ", ".to_string(),
        }
    }
}

// ============================================================================
// FieldResolver
// ============================================================================

/// Resolves extraction rules against an alert document.
///
/// Resolution is a pure function of the rules and the document; a resolver
/// holds nothing but its mode and may be shared freely.
///
/// # Examples
///
/// ```rust
/// use alert_relay_core::{FieldResolver, ResolutionMode, RuleSet};
/// use serde_json::json;
///
/// let document = json!({ "x": 1, "y": 2 });
/// let mut rules = RuleSet::new();
/// rules.insert("pair".to_string(), json!("$.x,$.y"));
///
/// let resolver = FieldResolver::new(ResolutionMode::comma_separated());
/// let params = resolver.resolve(&rules, &document).unwrap();
/// assert_eq!(params["pair"], "1, 2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldResolver {
    mode: ResolutionMode,
}

impl FieldResolver {
    /// Create a resolver using the given mode.
    pub fn new(mode: ResolutionMode) -> Self {
        Self { mode }
    }

    /// The mode this resolver applies to every rule.
    pub fn mode(&self) -> &ResolutionMode {
        &self.mode
    }

    /// Resolve every non-reserved rule in `rules` against `document`.
    ///
    /// Output keys keep the insertion order of `rules`. Non-string rule
    /// values are treated as literals and stringified.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidPath`] for the first rule containing a
    /// malformed JSONPath segment.
    pub fn resolve(
        &self,
        rules: &RuleSet,
        document: &Value,
    ) -> Result<ResolvedParams, ResolveError> {
        let mut params = ResolvedParams::new();

        for (field, rule) in rules {
            if is_reserved_field(field) {
                continue;
            }

            let value = match rule {
                Value::String(rule) => self.resolve_rule(field, rule, document)?,
                other => stringify::stringify(other),
            };

            params.insert(field.clone(), Value::String(value));
        }

        debug!(
            rule_count = rules.len(),
            resolved_count = params.len(),
            "Resolved alert fields"
        );

        Ok(params)
    }

    /// Resolve a single rule string for `field`.
    pub fn resolve_rule(
        &self,
        field: &str,
        rule: &str,
        document: &Value,
    ) -> Result<String, ResolveError> {
        match &self.mode {
            ResolutionMode::Segments { separator } => {
                segment::resolve_segments(field, rule, document, separator)
            }
            ResolutionMode::Template => Ok(template::interpolate(rule, document)),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
