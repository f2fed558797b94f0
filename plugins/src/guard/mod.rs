pub mod error;
mod json;
pub mod lakera;
pub mod models;

pub use error::GuardError;
pub use lakera::{decide, LakeraGuardClient, FLAGGED_REASON, LAKERA_GUARD_URL};
pub use models::{GuardMessage, GuardRequest, GuardVerdict, ToolCallDescriptor};
