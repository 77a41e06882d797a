//! Jokester function request/response types.
//!
//! The deployed function reads one item from a DynamoDB table named
//! `jokes<suffix>`. These types mirror its event and response shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Environment variable the function reads its table suffix from.
pub const TABLE_SUFFIX_ENV: &str = "JOKE_TABLE_SUFFIX";

/// Base name of the jokes table.
pub const TABLE_PREFIX: &str = "jokes";

/// Response returned when the event carries no usable ID.
pub const MISSING_ID_MESSAGE: &str = "no jokeID provided";

/// Invocation event: `{"jokeID": "42"}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JokeEvent {
    #[serde(rename = "jokeID", default, skip_serializing_if = "Option::is_none")]
    pub joke_id: Option<Value>,
}

impl JokeEvent {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            joke_id: Some(Value::String(id.to_string())),
        }
    }

    /// The ID as sent in the `N` attribute, or `None` when absent or falsy
    /// (`null`, `""`, `0`, `false`).
    ///
    /// Any other value is passed through as text, `true` included; DynamoDB
    /// rejects non-numeric keys and the lookup fails there.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.joke_id.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Function response: either the stored item (possibly `null`) or an error
/// object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JokeResponse {
    Error {
        #[serde(rename = "Error")]
        error: String,
    },
    Item(Option<Value>),
}

impl JokeResponse {
    #[must_use]
    pub fn missing_id() -> Self {
        Self::Error {
            error: MISSING_ID_MESSAGE.to_string(),
        }
    }
}

/// Table name for a given suffix.
#[must_use]
pub fn table_name(suffix: &str) -> String {
    format!("{TABLE_PREFIX}{suffix}")
}

/// DynamoDB key for a joke ID.
#[must_use]
pub fn item_key(id: &str) -> Value {
    json!({ "ID": { "N": id } })
}
