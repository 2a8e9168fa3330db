//! Serde helpers for request bodies whose text fields must never be rejected.
//!
//! `#[serde(default)]` only covers a missing key. These also absorb an explicit
//! `null` and values of the wrong JSON type.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text from loosely-typed JSON: strings as-is, numbers and booleans in their
/// JSON spelling, arrays joined with `"; "` (the skill-list separator).
/// Null and objects become empty.
pub fn text_from_json(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(text_from_json)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null | Value::Object(_) => String::new(),
    }
}

/// For `String` fields: use with `#[serde(default, deserialize_with = "lenient_text")]`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(text_from_json).unwrap_or_default())
}

/// For `Option<String>` fields: blank or unusable values come back as `None`.
pub fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_text(deserializer)?;
    Ok(Some(text).filter(|s| !s.trim().is_empty()))
}
