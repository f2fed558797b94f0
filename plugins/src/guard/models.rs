use serde::Serialize;
use serde_json::Value;

use lakera_guard_core::api::ToolCallEvent;

use super::json;

/// Body of `POST /v2/guard`, in OpenAI chat-completions message form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuardRequest {
    pub messages: Vec<GuardMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuardMessage {
    pub role: String,
    pub content: String,
    pub tool_calls: Vec<ToolCallDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallDescriptor {
    pub name: String,
    /// Compact JSON text of the tool params, in the host's key order and
    /// with numbers formatted as `JSON.stringify` formats them.
    pub arguments: String,
}

impl GuardMessage {
    /// The tool call rendered as an assistant turn with empty text content.
    pub fn assistant_tool_call(event: &ToolCallEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            role: "assistant".to_string(),
            content: String::new(),
            tool_calls: vec![ToolCallDescriptor {
                name: event.tool_name.clone(),
                arguments: json::to_string(&event.params)?,
            }],
        })
    }
}

/// What the guard said about one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardVerdict {
    pub flagged: bool,
    pub request_uuid: Option<String>,
}

impl GuardVerdict {
    /// Only a JSON `true` in `flagged` counts. A missing or non-boolean
    /// field, or a body that is not an object, is an unflagged verdict.
    pub fn from_value(body: &Value) -> Self {
        let flagged = matches!(body.get("flagged"), Some(Value::Bool(true)));
        let request_uuid = body
            .get("metadata")
            .and_then(|m| m.get("request_uuid"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            flagged,
            request_uuid,
        }
    }
}
