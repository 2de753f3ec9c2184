use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// A response body, read once and classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body declared as JSON and parsed successfully.
    Json(Value),
    /// Non-JSON body, or a JSON body that failed to parse.
    Text(String),
    /// No body.
    Empty,
}

impl Payload {
    /// Classify raw body text by its `content-type`.
    ///
    /// Malformed JSON falls back to [`Payload::Text`] instead of failing.
    pub fn parse(content_type: &str, text: String) -> Self {
        if text.is_empty() {
            return Self::Empty;
        }
        if !content_type.contains("application/json") {
            return Self::Text(text);
        }
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(e) => {
                tracing::warn!("Response declared JSON but failed to parse ({e}); using raw text");
                Self::Text(text)
            }
        }
    }

    /// The JSON value, if any.
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Look up a top-level field of a JSON object body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_json().and_then(|v| v.get(key))
    }

    /// Deserialize a JSON body into `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Json(value) => {
                serde_json::from_value(value).map_err(|e| Error::api(format!("Unexpected response shape: {e}")))
            }
            Self::Text(_) => Err(Error::api("Expected a JSON response but received text")),
            Self::Empty => Err(Error::api("Expected a JSON response but received an empty body")),
        }
    }

    /// Best human-readable message for a failed request.
    ///
    /// Preference: first field error, then `message`, then the status line.
    pub fn error_message(&self, status_line: &str) -> String {
        match self {
            Self::Text(text) if !text.is_empty() => text.clone(),
            Self::Json(Value::String(text)) if !text.is_empty() => text.clone(),
            Self::Json(Value::Object(map)) => first_field_error(map.get("errors"))
                .or_else(|| {
                    map.get("message")
                        .and_then(Value::as_str)
                        .filter(|m| !m.is_empty())
                        .map(String::from)
                })
                .unwrap_or_else(|| status_line.to_string()),
            _ => status_line.to_string(),
        }
    }
}

/// First entry of an `errors` mapping, with array values flattened one level.
fn first_field_error(errors: Option<&Value>) -> Option<String> {
    let Value::Object(errors) = errors? else {
        return None;
    };
    errors
        .values()
        .flat_map(|v| match v {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .find_map(|entry| match entry {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
}

/// `HTTP <status>: <reason>`
pub fn status_line(status: reqwest::StatusCode) -> String {
    format!("HTTP {}: {}", status.as_u16(), status.canonical_reason().unwrap_or(""))
}
