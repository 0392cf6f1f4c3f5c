//! Helpers for reading the backend's response envelope.
//!
//! Responses look like `{ message, statusCode, isSuccess, data, data1, ... }`
//! but the payload key and record field names drift between endpoints, so
//! everything here probes an ordered list of candidate keys.

use serde_json::Value;

/// `isSuccess == true && statusCode == 1`. Both are required.
pub fn is_envelope_success(response: &Value) -> bool {
    response.get("isSuccess").and_then(Value::as_bool) == Some(true)
        && response.get("statusCode").and_then(Value::as_i64) == Some(1)
}

/// The envelope's `message`, if it is a non-empty string.
pub fn envelope_message(response: &Value) -> Option<String> {
    response
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
}

/// First candidate key that is present with a non-null value.
pub fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| !v.is_null())
}

/// Like [`first_present`], additionally skipping empty strings.
pub fn first_present_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter(|v| !v.is_null())
        .map(value_to_plain_string)
        .find(|s| !s.is_empty())
}

/// First candidate key holding a non-empty array.
pub fn first_non_empty_array(value: &Value, keys: &[&str]) -> Option<Vec<Value>> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(Value::as_array)
        .find(|items| !items.is_empty())
        .cloned()
}

/// Top-level keys of an object, for diagnostics.
pub fn top_level_keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}

/// Render a scalar without JSON quoting (`"12"` and `12` both become `12`).
pub fn value_to_plain_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
