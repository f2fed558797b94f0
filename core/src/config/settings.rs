use secrecy::SecretString;
use serde_json::Value;

use crate::error::ConfigError;
use crate::hook::GateDecision;

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

pub const FAIL_CLOSED_REASON: &str = "Lakera Guard unavailable; failing closed";

/// What happens to a tool call when the guard service cannot answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailMode {
    /// Allow the call. Host availability wins over guard availability.
    #[default]
    Open,
    /// Block the call with [`FAIL_CLOSED_REASON`].
    Closed,
}

impl FailMode {
    /// Only an explicit `"closed"` opts out of the default.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("closed") {
            FailMode::Closed
        } else {
            FailMode::Open
        }
    }

    pub fn on_failure(&self) -> GateDecision {
        match self {
            FailMode::Open => GateDecision::Allow,
            FailMode::Closed => GateDecision::block(FAIL_CLOSED_REASON),
        }
    }
}

/// Validated plugin settings. Built once per registration and never mutated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: SecretString,
    pub project_id: Option<String>,
    pub timeout_ms: u64,
    pub fail_mode: FailMode,
}

impl Settings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            project_id: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fail_mode: FailMode::default(),
        }
    }

    /// Project id to send, if any. Blank ids are treated as unset.
    pub fn effective_project_id(&self) -> Option<&str> {
        self.project_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Turns the host's raw plugin config into [`Settings`].
///
/// A missing, blank or non-string `apiKey` is the normal "not configured"
/// state and yields [`ConfigError::ApiKeyNotConfigured`]. Every other field
/// is lenient: bad values fall back to defaults or are dropped.
pub fn resolve_settings(raw: Option<&Value>) -> Result<Settings, ConfigError> {
    let Some(cfg) = raw.and_then(Value::as_object) else {
        return Err(ConfigError::ApiKeyNotConfigured);
    };

    let api_key = match cfg.get("apiKey").and_then(Value::as_str).map(str::trim) {
        Some(key) if !key.is_empty() => SecretString::from(key.to_string()),
        _ => return Err(ConfigError::ApiKeyNotConfigured),
    };

    let timeout_ms = cfg
        .get("timeoutMs")
        .and_then(Value::as_f64)
        .and_then(positive_millis)
        .unwrap_or(DEFAULT_TIMEOUT_MS);

    let project_id = cfg
        .get("projectId")
        .and_then(Value::as_str)
        .map(str::to_string);

    let fail_mode = cfg
        .get("failMode")
        .and_then(Value::as_str)
        .map(FailMode::parse)
        .unwrap_or_default();

    Ok(Settings {
        api_key,
        project_id,
        timeout_ms,
        fail_mode,
    })
}

fn positive_millis(ms: f64) -> Option<u64> {
    if ms.is_finite() && ms > 0.0 {
        Some(ms.ceil() as u64)
    } else {
        None
    }
}
