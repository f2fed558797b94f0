use std::sync::Arc;

use async_trait::async_trait;

use lakera_guard_core::api::{
    resolve_settings, DiagnosticLogger, GateDecision, HookContext, HookName, PluginHost,
    ToolCallEvent, ToolCallHook,
};

use crate::factory;
use crate::guard::{decide, LakeraGuardClient, LAKERA_GUARD_URL};

pub const PLUGIN_ID: &str = "openclaw-plugin-lakera-guard";

/// What `register` did to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Installed,
    /// No usable `apiKey`; nothing was attached.
    NotConfigured,
    /// The HTTP client could not be built; nothing was attached.
    ClientUnavailable,
}

pub fn register(host: &mut dyn PluginHost) -> Registration {
    register_with_endpoint(host, LAKERA_GUARD_URL)
}

/// Like [`register`], but sends guard requests to `endpoint`.
pub fn register_with_endpoint(host: &mut dyn PluginHost, endpoint: &str) -> Registration {
    let logger = host.logger();

    let Ok(settings) = resolve_settings(host.plugin_config()) else {
        logger.warn(&format!(
            "{PLUGIN_ID} plugin: apiKey not configured; plugin no-op"
        ));
        return Registration::NotConfigured;
    };

    match factory::build_guard_hook(settings, endpoint, logger.clone()) {
        Ok(hook) => {
            host.on(HookName::BeforeToolCall, hook);
            Registration::Installed
        }
        Err(e) => {
            logger.warn(&format!("{PLUGIN_ID} plugin: {e}; plugin no-op"));
            Registration::ClientUnavailable
        }
    }
}

/// `before_tool_call` handler backed by [`LakeraGuardClient`].
pub struct LakeraGuardHook {
    client: LakeraGuardClient,
    logger: Arc<dyn DiagnosticLogger>,
}

impl LakeraGuardHook {
    pub fn new(client: LakeraGuardClient, logger: Arc<dyn DiagnosticLogger>) -> Self {
        Self { client, logger }
    }
}

#[async_trait]
impl ToolCallHook for LakeraGuardHook {
    fn name(&self) -> &str {
        PLUGIN_ID
    }

    async fn before_tool_call(&self, event: &ToolCallEvent, _ctx: &HookContext) -> GateDecision {
        match self.client.classify(event).await {
            Ok(verdict) => decide(&verdict),
            Err(e) => {
                self.logger
                    .warn(&format!("{PLUGIN_ID}: guard request failed: {e}"));
                self.client.settings().fail_mode.on_failure()
            }
        }
    }
}
