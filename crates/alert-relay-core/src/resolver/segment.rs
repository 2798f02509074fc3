//! Segment mode: comma-separated literals and JSONPath queries.
//!
//! A rule such as `host ,$.commonLabels.instance, is down` is split on `,`.
//! Segments starting with `$` are evaluated as JSONPath queries against the
//! document and contribute one part per match; every other segment is one
//! literal part. All parts are joined, in order, with the mode's separator.
//!
//! A rule in which no segment starts with `$` is a plain literal and is
//! returned unchanged, commas included.

use super::stringify::stringify;
use crate::ResolveError;
use serde_json::Value;
use serde_json_path::JsonPath;

const SEGMENT_DELIMITER: char = ',';

/// Returns `true` when `segment` is a JSONPath query rather than a literal.
pub fn is_path_segment(segment: &str) -> bool {
    segment.starts_with('$')
}

/// Resolve a segment-mode rule for `field`.
///
/// Literal segments and stringified matches are joined with `separator`.
/// A query with no matches contributes no part.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidPath`] when a `$`-prefixed segment is not
/// valid JSONPath.
pub fn resolve_segments(
    field: &str,
    rule: &str,
    document: &Value,
    separator: &str,
) -> Result<String, ResolveError> {
    if !rule.split(SEGMENT_DELIMITER).any(is_path_segment) {
        return Ok(rule.to_string());
    }

    let mut parts: Vec<String> = Vec::new();
    for segment in rule.split(SEGMENT_DELIMITER) {
        if is_path_segment(segment) {
            parts.extend(query(field, segment, document)?);
        } else {
            parts.push(segment.to_string());
        }
    }

    Ok(parts.join(separator))
}

/// Evaluate `path` against `document` and stringify every match.
fn query(field: &str, path: &str, document: &Value) -> Result<Vec<String>, ResolveError> {
    let compiled = JsonPath::parse(path).map_err(|e| ResolveError::InvalidPath {
        field: field.to_string(),
        path: path.to_string(),
        message: e.to_string(),
    })?;

    Ok(compiled
        .query(document)
        .all()
        .into_iter()
        .map(stringify)
        .collect())
}

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;
