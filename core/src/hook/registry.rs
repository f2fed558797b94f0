use std::sync::Arc;

use serde_json::Value;

use super::{
    DiagnosticLogger, GateDecision, HookContext, HookName, PluginHost, ToolCallEvent, ToolCallHook,
};

/// In-process [`PluginHost`]: keeps the raw plugin config, the logger and
/// every handler plugins attach, and dispatches tool calls through them.
pub struct HookRegistry {
    config: Option<Value>,
    logger: Arc<dyn DiagnosticLogger>,
    handlers: Vec<(HookName, Arc<dyn ToolCallHook>)>,
}

impl HookRegistry {
    pub fn new(config: Option<Value>, logger: Arc<dyn DiagnosticLogger>) -> Self {
        Self {
            config,
            logger,
            handlers: Vec::new(),
        }
    }

    pub fn handler_count(&self, hook: HookName) -> usize {
        self.handlers.iter().filter(|(name, _)| *name == hook).count()
    }

    /// Runs `before_tool_call` handlers in registration order.
    /// The first `Block` wins; later handlers are not consulted.
    pub async fn run_before_tool_call(
        &self,
        event: &ToolCallEvent,
        ctx: &HookContext,
    ) -> GateDecision {
        for (name, handler) in &self.handlers {
            if *name != HookName::BeforeToolCall {
                continue;
            }
            let decision = handler.before_tool_call(event, ctx).await;
            if decision.is_block() {
                tracing::debug!(
                    target: "lakera_guard.hook",
                    handler = handler.name(),
                    tool = %event.tool_name,
                    "tool call blocked"
                );
                return decision;
            }
        }
        GateDecision::Allow
    }
}

impl PluginHost for HookRegistry {
    fn plugin_config(&self) -> Option<&Value> {
        self.config.as_ref()
    }

    fn on(&mut self, hook: HookName, handler: Arc<dyn ToolCallHook>) {
        tracing::debug!(
            target: "lakera_guard.hook",
            hook = %hook,
            handler = handler.name(),
            "handler registered"
        );
        self.handlers.push((hook, handler));
    }

    fn logger(&self) -> Arc<dyn DiagnosticLogger> {
        self.logger.clone()
    }
}
