//! Template mode: inline interpolation of dotted JSONPath expressions.
//!
//! Only simple member-access paths are recognised: a literal `$.` followed by
//! one or more `[a-zA-Z0-9_]+` identifiers separated by `.`. Wildcards,
//! subscripts, slices and filters are never matched, so text such as
//! `$.alerts[0]` only has its `$.alerts` prefix interpolated.
//!
//! Each distinct matched text is resolved once and then substituted for every
//! occurrence of that exact text. Substitutions run one after another in order
//! of first occurrence, each on the output of the previous one.

use super::stringify::stringify;
use regex::Regex;
use serde_json::Value;
use serde_json_path::JsonPath;
use std::sync::OnceLock;

/// Separator placed between the matches of a single embedded path.
const MATCH_SEPARATOR: &str = " ";

fn path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\.[a-zA-Z0-9_]+(?:\.[a-zA-Z0-9_]+)*")
            .expect("embedded JSONPath pattern is a valid regex")
    })
}

/// Distinct embedded paths in `template`, in order of first occurrence.
pub fn embedded_paths(template: &str) -> Vec<&str> {
    let mut paths: Vec<&str> = Vec::new();
    for found in path_pattern().find_iter(template) {
        let text = found.as_str();
        if !paths.contains(&text) {
            paths.push(text);
        }
    }
    paths
}

/// Replace every embedded dotted path in `template` with its resolved value.
///
/// A path with no match in `document` is replaced by an empty string.
pub fn interpolate(template: &str, document: &Value) -> String {
    let mut output = template.to_string();

    for path in embedded_paths(template) {
        let resolved = evaluate_dotted(path, document).join(MATCH_SEPARATOR);
        output = output.replace(path, &resolved);
    }

    output
}

/// Evaluate a dotted path such as `$.a.b` against `document`.
///
/// The path is evaluated as the equivalent bracketed member path
/// (`$['a']['b']`) so that identifiers starting with a digit address object
/// members the same way as any other identifier.
fn evaluate_dotted(path: &str, document: &Value) -> Vec<String> {
    let bracketed = path
        .trim_start_matches("$.")
        .split('.')
        .fold(String::from("$"), |mut acc, member| {
            acc.push_str("['");
            acc.push_str(member);
            acc.push_str("']");
            acc
        });

    match JsonPath::parse(&bracketed) {
        Ok(compiled) => compiled
            .query(document)
            .all()
            .into_iter()
            .map(stringify)
            .collect(),
        // Members are restricted to [a-zA-Z0-9_], so the bracketed form
        // always parses.
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
