//! String conversion for JSONPath matches.

use serde_json::Value;

/// Convert a matched JSON value into the string placed in the output.
///
/// - strings are used as-is, without quotes
/// - integral floats drop the fractional part (`2.0` becomes `2`)
/// - `null` becomes `null`
/// - arrays join their stringified elements with `,`
/// - objects are encoded as compact JSON
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
#[path = "stringify_tests.rs"]
mod tests;
