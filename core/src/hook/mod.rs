mod event;
mod logger;
mod registry;
mod r#trait;

pub use event::{GateDecision, HookContext, ToolCallEvent};
pub use logger::TracingLogger;
pub use r#trait::{DiagnosticLogger, HookName, PluginHost, ToolCallHook};
pub use registry::HookRegistry;
