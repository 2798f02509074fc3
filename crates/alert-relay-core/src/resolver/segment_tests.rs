//! Tests for segment-mode resolution.

use super::*;
use serde_json::json;

fn resolve(rule: &str, document: &Value, separator: &str) -> String {
    resolve_segments("field", rule, document, separator).expect("rule should resolve")
}

#[test]
fn test_literal_without_path_segment_is_unchanged() {
    let document = json!({"x": 1});

    assert_eq!(resolve("plain text", &document, ""), "plain text");
    assert_eq!(resolve("keeps, its, commas", &document, ""), "keeps, its, commas");
    assert_eq!(resolve("", &document, ""), "");
}

#[test]
fn test_single_scalar_path_yields_its_string_form() {
    let document = json!({"status": "firing", "count": 3});

    assert_eq!(resolve("$.status", &document, ""), "firing");
    assert_eq!(resolve("$.count", &document, ", "), "3");
}

#[test]
fn test_literals_and_paths_are_concatenated_in_order() {
    let document = json!({"x": 1});

    assert_eq!(resolve("a,$.x,b", &document, ""), "a1b");
}

#[test]
fn test_comma_separator_joins_multiple_matches() {
    let document = json!({
        "alerts": [
            {"labels": {"instance": "db-1"}},
            {"labels": {"instance": "db-2"}}
        ]
    });

    assert_eq!(
        resolve("$.alerts[*].labels.instance", &document, ", "),
        "db-1, db-2"
    );
    assert_eq!(
        resolve("$.alerts[*].labels.instance", &document, ""),
        "db-1db-2"
    );
}

#[test]
fn test_separator_is_placed_between_every_part() {
    let document = json!({"x": 1, "y": 2});

    assert_eq!(resolve("$.x,$.y", &document, ""), "12");
    assert_eq!(resolve("$.x,$.y", &document, ", "), "1, 2");
    assert_eq!(resolve("a,$.x,b", &document, ", "), "a, 1, b");
}

#[test]
fn test_path_with_no_match_contributes_nothing() {
    let document = json!({"x": 1});

    assert_eq!(resolve("before ,$.missing, after", &document, ""), "before  after");
    assert_eq!(resolve("a,$.missing,b", &document, ", "), "a, b");
    assert_eq!(resolve("$.missing", &document, ", "), "");
}

#[test]
fn test_segment_with_leading_space_is_literal() {
    let document = json!({"x": 1, "y": 2});

    assert_eq!(resolve("$.x, $.y", &document, ""), "1 $.y");
}

#[test]
fn test_non_scalar_match_is_stringified() {
    let document = json!({"tags": ["a", "b"], "meta": {"k": "v"}});

    assert_eq!(resolve("$.tags", &document, ""), "a,b");
    assert_eq!(resolve("$.meta", &document, ""), r#"{"k":"v"}"#);
}

#[test]
fn test_malformed_path_is_attributed_to_field() {
    let document = json!({});

    let error = resolve_segments("summary", "$[", &document, "").unwrap_err();

    match error {
        ResolveError::InvalidPath { field, path, .. } => {
            assert_eq!(field, "summary");
            assert_eq!(path, "$[");
        }
    }
}

#[test]
fn test_is_path_segment() {
    assert!(is_path_segment("$.a"));
    assert!(is_path_segment("$"));
    assert!(!is_path_segment(" $.a"));
    assert!(!is_path_segment("a"));
}
