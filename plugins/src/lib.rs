//! Lakera Guard screening for `before_tool_call`.

pub mod factory;
pub mod guard;
pub mod hook;

pub use hook::{register, register_with_endpoint, LakeraGuardHook, Registration, PLUGIN_ID};
