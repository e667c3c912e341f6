//! The `{success, data?, message?}` wrapper every backend endpoint returns.
//!
//! Decoded once at the client boundary: anything other than `success: true`
//! becomes [`ClientError::Api`] carrying the backend message.

use kaushalya_core::wire::value_to_text;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

const FALLBACK_MESSAGE: &str = "request failed";

/// A successful response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub data: Option<Value>,
    pub message: Option<String>,
}

impl Envelope {
    /// Checks `success` and splits out `data` and `message`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] unless the body is an object with
    /// `success: true`.
    pub fn from_body(body: Value) -> Result<Self, ClientError> {
        let Value::Object(mut map) = body else {
            return Err(ClientError::Api(
                "response is not a JSON envelope".to_owned(),
            ));
        };
        let message = map.get("message").and_then(value_to_text);
        if map.get("success") != Some(&Value::Bool(true)) {
            return Err(ClientError::Api(
                message.unwrap_or_else(|| FALLBACK_MESSAGE.to_owned()),
            ));
        }
        let data = map.remove("data").filter(|d| !d.is_null());
        Ok(Self { data, message })
    }

    /// `message` of an error body, if it looks like an envelope.
    pub(crate) fn error_message(body: &Value) -> Option<String> {
        body.get("message").and_then(value_to_text)
    }

    /// Decodes `data` as a single value. Absent `data` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Deserialize`] if `data` does not match `T`.
    pub fn decode<T: DeserializeOwned>(self, context: &str) -> Result<Option<T>, ClientError> {
        self.data
            .map(serde_json::from_value)
            .transpose()
            .map_err(|source| ClientError::Deserialize {
                context: context.to_owned(),
                source,
            })
    }

    /// `data` as raw list elements, in backend order. Absent or non-list
    /// `data` is empty.
    #[must_use]
    pub fn into_items(self, context: &str) -> Vec<Value> {
        match self.data {
            Some(Value::Array(items)) => items,
            None => Vec::new(),
            Some(other) => {
                tracing::warn!(context, kind = json_kind(&other), "expected a list; treating as empty");
                Vec::new()
            }
        }
    }

    /// Decodes `data` as a collection. Absent or non-list `data` is empty and
    /// elements that fail to decode are skipped.
    #[must_use]
    pub fn into_list<T: DeserializeOwned>(self, context: &str) -> Vec<T> {
        decode_items(&self.into_items(context), context)
    }
}

/// Decodes each element of `items`, skipping the ones that do not fit `T`.
pub(crate) fn decode_items<T: DeserializeOwned>(items: &[Value], context: &str) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value::<T>(item.clone())
                .map_err(|e| {
                    tracing::warn!(context, index, error = %e, "skipping malformed record");
                })
                .ok()
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
