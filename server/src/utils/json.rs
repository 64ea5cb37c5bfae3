//! JSON text column encoding
//!
//! Listing `services` and `photos` are stored as JSON arrays in TEXT columns.
//! Writes always produce a valid array (`[]` when empty). Reads never fail:
//! anything that is not a JSON array of strings decodes to an empty list.

use serde_json::Value as JsonValue;

/// Empty JSON array literal, used as the column default
pub const EMPTY_JSON_ARRAY: &str = "[]";

/// Encode a list of strings as a JSON array
pub fn encode_string_array<S: AsRef<str>>(values: &[S]) -> String {
    let array: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
    serde_json::to_string(&array).unwrap_or_else(|_| EMPTY_JSON_ARRAY.to_string())
}

/// Decode a JSON array of strings, tolerating corrupted column content.
///
/// Non-string elements inside an otherwise valid array are skipped.
pub fn decode_string_array(raw: &str) -> Vec<String> {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(JsonValue::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                JsonValue::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Ok(other) => {
            tracing::debug!(kind = json_kind(&other), "Expected JSON array, using empty list");
            Vec::new()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Unparseable JSON array column, using empty list");
            Vec::new()
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
