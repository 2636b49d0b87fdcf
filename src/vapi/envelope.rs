//! Result envelope expected by the voice platform:
//! `{"results": [{"toolCallId": "...", "result": ...}]}`.

use serde::Serialize;

/// Result value for operations that only mutate.
pub const SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResults<T> {
    pub results: Vec<ToolResult<T>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult<T> {
    #[serde(rename = "toolCallId")]
    pub tool_call_id: String,
    pub result: T,
}

impl<T> ToolResults<T> {
    /// Envelope with exactly one result.
    pub fn single(tool_call_id: impl Into<String>, result: T) -> Self {
        Self {
            results: vec![ToolResult {
                tool_call_id: tool_call_id.into(),
                result,
            }],
        }
    }
}

impl ToolResults<&'static str> {
    /// Acknowledge a successful mutation.
    pub fn success(tool_call_id: impl Into<String>) -> Self {
        Self::single(tool_call_id, SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_envelope_shape() {
        let json = serde_json::to_value(ToolResults::success("call_1")).unwrap();
        assert_eq!(
            json,
            json!({"results": [{"toolCallId": "call_1", "result": "success"}]})
        );
    }

    #[test]
    fn data_envelope_shape() {
        let data = vec![json!({"id": 1, "title": "milk", "description": null, "completed": false})];
        let json = serde_json::to_value(ToolResults::single("call_2", data)).unwrap();
        assert_eq!(json["results"].as_array().unwrap().len(), 1);
        assert_eq!(json["results"][0]["toolCallId"], "call_2");
        assert_eq!(json["results"][0]["result"][0]["title"], "milk");
        assert!(json["results"][0]["result"][0]["description"].is_null());
    }
}
