//! String normalization for request bodies
//!
//! Used as `deserialize_with` targets so validators see the value that will
//! be stored, and so stored tags compare equal to the trimmed tags the filter
//! parser produces.

use serde::{Deserialize, Deserializer};

/// Deserialize a string with surrounding whitespace removed
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(trim_owned)
}

/// Deserialize an optional string with surrounding whitespace removed.
///
/// A blank value becomes `None`. Fields using this need `#[serde(default)]`
/// so a missing key still deserializes.
pub fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|value| value.map(trim_owned).filter(|v| !v.is_empty()))
}

fn trim_owned(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}
