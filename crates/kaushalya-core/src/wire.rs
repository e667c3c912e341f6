//! Lenient decoders for backend JSON.
//!
//! The storefront backend is authoritative but its records are not guaranteed
//! complete: numbers arrive as strings, ids arrive as either strings or
//! integers, and list fields are sometimes `null`. The helpers here are used
//! with `#[serde(deserialize_with = "...")]` so that a single odd field never
//! rejects a whole record.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque backend identifier. Kept as text regardless of its wire type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self(value_to_text(&value).unwrap_or_default()))
    }
}

/// Renders scalar JSON as text. Objects, arrays and `null` have no text form.
#[must_use]
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Optional text field; non-scalar values decode as `None`.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

/// Required text field; anything unusable decodes as the empty string.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text(deserializer)?.unwrap_or_default())
}

/// Text converted into a domain type. Blank text decodes as `None`.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn parsed_text<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(text(deserializer)?
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .map(T::from))
}

/// A list field. Non-list values decode as an empty list and elements that
/// fail to decode are dropped.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// A single URL or a list of URLs, with blank entries removed.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let links = match value {
        Value::Array(items) => items.iter().filter_map(value_to_text).collect(),
        other => value_to_text(&other).into_iter().collect::<Vec<_>>(),
    };
    Ok(links
        .into_iter()
        .filter(|link| !link.trim().is_empty())
        .collect())
}

/// Non-negative count; unusable values decode as 0.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(opt_count(deserializer)?.unwrap_or(0))
}

/// Optional non-negative count.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn opt_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_count(&value))
}

fn value_to_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(float_to_count)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_count))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_count(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default)]
        id: RecordId,
        #[serde(default, deserialize_with = "text")]
        label: Option<String>,
        #[serde(default, deserialize_with = "list_or_empty")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "one_or_many")]
        images: Vec<String>,
        #[serde(default, deserialize_with = "count")]
        qty: u64,
    }

    #[test]
    fn numeric_id_becomes_text() {
        let probe: Probe = serde_json::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(probe.id.as_str(), "42");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert!(probe.id.is_empty());
        assert!(probe.label.is_none());
        assert!(probe.tags.is_empty());
        assert!(probe.images.is_empty());
        assert_eq!(probe.qty, 0);
    }

    #[test]
    fn non_list_decodes_as_empty_list() {
        let probe: Probe = serde_json::from_value(json!({ "tags": "oops" })).unwrap();
        assert!(probe.tags.is_empty());
        let probe: Probe = serde_json::from_value(json!({ "tags": null })).unwrap();
        assert!(probe.tags.is_empty());
    }

    #[test]
    fn list_drops_bad_elements() {
        let probe: Probe = serde_json::from_value(json!({ "tags": ["a", 1, "b"] })).unwrap();
        assert_eq!(probe.tags, vec!["a", "b"]);
    }

    #[test]
    fn one_or_many_accepts_single_string() {
        let probe: Probe = serde_json::from_value(json!({ "images": "/a.jpg" })).unwrap();
        assert_eq!(probe.images, vec!["/a.jpg"]);
        let probe: Probe =
            serde_json::from_value(json!({ "images": ["/a.jpg", " ", "/b.jpg"] })).unwrap();
        assert_eq!(probe.images, vec!["/a.jpg", "/b.jpg"]);
    }

    #[test]
    fn count_accepts_strings_and_floats() {
        let probe: Probe = serde_json::from_value(json!({ "qty": "3" })).unwrap();
        assert_eq!(probe.qty, 3);
        let probe: Probe = serde_json::from_value(json!({ "qty": 2.0 })).unwrap();
        assert_eq!(probe.qty, 2);
        let probe: Probe = serde_json::from_value(json!({ "qty": -1 })).unwrap();
        assert_eq!(probe.qty, 0);
    }

    #[test]
    fn label_from_number() {
        let probe: Probe = serde_json::from_value(json!({ "label": 7 })).unwrap();
        assert_eq!(probe.label.as_deref(), Some("7"));
    }
}
