//! Ordered-candidate field lookup over untyped records.

use serde_json::Value;

/// Walks `names` in order and returns the first field of `record` for which
/// `pick` yields a value. Absent fields and rejected values fall through.
pub fn first_of<'a, T>(
    record: &'a Value,
    names: &[&str],
    pick: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    names
        .iter()
        .filter_map(|name| record.get(*name))
        .find_map(pick)
}

pub fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// First non-empty string among the candidate fields.
pub fn first_str<'a>(record: &'a Value, names: &[&str]) -> Option<&'a str> {
    first_of(record, names, non_empty_str)
}

/// Text form of an identifier-like scalar. Empty strings and zero are treated as absent.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// A tag list, or a single tag string promoted to a one-element list.
pub fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(s) if !s.is_empty() => Some(vec![s.clone()]),
        _ => None,
    }
}
