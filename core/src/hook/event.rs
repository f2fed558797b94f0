use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One intercepted tool invocation, as handed over by the host.
///
/// `params` keeps the host's key order; the guard forwards it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallEvent {
    pub tool_name: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ToolCallEvent {
    pub fn new(tool_name: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            params,
        }
    }
}

/// Secondary value passed alongside a [`ToolCallEvent`]. Hooks may ignore it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
}

/// Outcome of a `before_tool_call` hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    #[default]
    Allow,
    Block { reason: String },
}

impl GateDecision {
    pub fn block(reason: impl Into<String>) -> Self {
        GateDecision::Block {
            reason: reason.into(),
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, GateDecision::Block { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            GateDecision::Allow => None,
            GateDecision::Block { reason } => Some(reason),
        }
    }
}
