//! Tool-call webhook payloads.
//!
//! ```json
//! {"message": {"toolCalls": [
//!     {"id": "call_1", "function": {"name": "createTodo", "arguments": "{\"title\": \"milk\"}"}}
//! ]}}
//! ```
//!
//! `arguments` arrives either as JSON text or as an object; both collapse
//! into [`ToolArguments`] before any handler sees them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ServiceError;

/// Body of a tool-call webhook. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub message: ToolCallMessage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallMessage {
    #[serde(rename = "toolCalls", default)]
    pub tool_calls: Vec<ToolCall>,
}

/// One parsed user intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque id echoed back in the result envelope.
    pub id: String,
    pub function: ToolFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: RawArguments,
}

/// Arguments exactly as the platform sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawArguments {
    /// JSON-encoded object.
    Json(String),
    /// Already-structured object.
    Object(Map<String, Value>),
    /// Any other JSON value. Only `null` decodes; the rest are rejected.
    Other(Value),
}

impl Default for RawArguments {
    fn default() -> Self {
        RawArguments::Object(Map::new())
    }
}

impl RawArguments {
    /// Decode into a key/value map. JSON text must hold an object; `null`
    /// counts as no arguments.
    pub fn decode(&self) -> Result<ToolArguments, ServiceError> {
        match self {
            RawArguments::Object(map) => Ok(ToolArguments(map.clone())),
            RawArguments::Other(Value::Null) => Ok(ToolArguments::default()),
            RawArguments::Other(other) => Err(ServiceError::Decode(format!(
                "expected a JSON object, got {}",
                json_kind(other)
            ))),
            RawArguments::Json(text) => {
                match serde_json::from_str::<Value>(text)
                    .map_err(|e| ServiceError::Decode(e.to_string()))?
                {
                    Value::Object(map) => Ok(ToolArguments(map)),
                    other => Err(ServiceError::Decode(format!(
                        "expected a JSON object, got {}",
                        json_kind(&other)
                    ))),
                }
            }
        }
    }
}

impl From<Value> for RawArguments {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => RawArguments::Object(map),
            Value::String(text) => RawArguments::Json(text),
            other => RawArguments::Other(other),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalized tool-call arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    /// String value for `key`. Non-string values count as absent.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// String value for `key`, or `""` when absent.
    pub fn str_or_empty(&self, key: &str) -> &str {
        self.get_str(key).unwrap_or("")
    }

    /// Whitespace-trimmed value for `key`, `None` if absent or blank.
    pub fn trimmed(&self, key: &str) -> Option<&str> {
        self.get_str(key).map(str::trim).filter(|s| !s.is_empty())
    }

}
