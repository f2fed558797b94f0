use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{GateDecision, HookContext, ToolCallEvent};

/// Host extension points a plugin can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookName {
    BeforeToolCall,
}

impl HookName {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookName::BeforeToolCall => "before_tool_call",
        }
    }
}

impl std::fmt::Display for HookName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback attached to [`HookName::BeforeToolCall`].
///
/// Infallible: a hook resolves every failure into a decision and reports
/// it through the host logger.
#[async_trait]
pub trait ToolCallHook: Send + Sync {
    fn name(&self) -> &str;

    async fn before_tool_call(&self, event: &ToolCallEvent, ctx: &HookContext) -> GateDecision;
}

/// Fire-and-forget diagnostic sink owned by the host.
pub trait DiagnosticLogger: Send + Sync {
    fn warn(&self, message: &str);
}

/// What a plugin receives at registration time.
pub trait PluginHost {
    /// Raw plugin configuration exactly as the host stored it. Not validated.
    fn plugin_config(&self) -> Option<&Value>;

    fn on(&mut self, hook: HookName, handler: Arc<dyn ToolCallHook>);

    fn logger(&self) -> Arc<dyn DiagnosticLogger>;
}
