use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::ConfigError;

pub const API_KEY_ENV: &str = "LAKERA_GUARD_API_KEY";
pub const PROJECT_ID_ENV: &str = "LAKERA_GUARD_PROJECT_ID";

/// Reads the raw plugin config a standalone host would hand to `register`.
///
/// The TOML file is optional; overrides from `env` (usually
/// `std::env::var`) are applied on top. Nothing is validated here, see
/// [`super::resolve_settings`].
pub fn load_plugin_config<F>(path: Option<&Path>, env: F) -> Result<Value, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match path {
        Some(p) => read_table(p)?,
        None => Map::new(),
    };
    apply_env_overrides(&mut cfg, env);
    Ok(Value::Object(cfg))
}

pub fn apply_env_overrides<F>(cfg: &mut Map<String, Value>, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (env_key, cfg_key) in [(API_KEY_ENV, "apiKey"), (PROJECT_ID_ENV, "projectId")] {
        if let Some(v) = lookup(env_key) {
            if !v.trim().is_empty() {
                cfg.insert(cfg_key.to_string(), Value::String(v));
            }
        }
    }
}

fn read_table(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table: toml::Table = toml::from_str(&s)?;
    Ok(table
        .into_iter()
        .map(|(k, v)| (k, toml_to_json(v)))
        .collect())
}

fn toml_to_json(v: toml::Value) -> Value {
    match v {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(a) => Value::Array(a.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(t) => {
            Value::Object(t.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}
