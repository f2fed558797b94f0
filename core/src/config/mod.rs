mod load;
mod settings;

pub use load::{apply_env_overrides, load_plugin_config, API_KEY_ENV, PROJECT_ID_ENV};
pub use settings::{resolve_settings, FailMode, Settings, DEFAULT_TIMEOUT_MS, FAIL_CLOSED_REASON};
