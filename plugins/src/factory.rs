use std::sync::Arc;

use lakera_guard_core::api::{DiagnosticLogger, Settings, ToolCallHook};

use crate::guard::{GuardError, LakeraGuardClient};
use crate::hook::LakeraGuardHook;

pub fn build_guard_hook(
    settings: Settings,
    endpoint: &str,
    logger: Arc<dyn DiagnosticLogger>,
) -> Result<Arc<dyn ToolCallHook>, GuardError> {
    let client = LakeraGuardClient::with_endpoint(settings, endpoint)?;
    Ok(Arc::new(LakeraGuardHook::new(client, logger)))
}
