//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `lakera_guard_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_plugin_config, resolve_settings, FailMode, Settings, DEFAULT_TIMEOUT_MS,
    FAIL_CLOSED_REASON,
};
pub use crate::error::ConfigError;
pub use crate::hook::{
    DiagnosticLogger, GateDecision, HookContext, HookName, HookRegistry, PluginHost,
    ToolCallEvent, ToolCallHook, TracingLogger,
};
