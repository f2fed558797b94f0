use std::io::Read;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::{Map, Value};

use lakera_guard_core::api::{
    load_plugin_config, GateDecision, HookContext, HookRegistry, ToolCallEvent, TracingLogger,
};

use super::cli::CheckArgs;

pub async fn run_check(args: CheckArgs) -> anyhow::Result<GateDecision> {
    check_with_env(args, |key| std::env::var(key).ok()).await
}

async fn check_with_env<F>(args: CheckArgs, env: F) -> anyhow::Result<GateDecision>
where
    F: Fn(&str) -> Option<String>,
{
    let config = load_plugin_config(args.config.as_deref(), env)?;
    let event = read_event(&args, std::io::stdin())?;

    let mut registry = HookRegistry::new(Some(config), Arc::new(TracingLogger));
    let registration = lakera_guard_plugins::register(&mut registry);
    tracing::debug!(target: "lakera_guard.cli", ?registration, "plugin registration");

    let ctx = HookContext {
        tool_name: Some(event.tool_name.clone()),
        ..HookContext::default()
    };
    Ok(registry.run_before_tool_call(&event, &ctx).await)
}

fn read_event<R: Read>(args: &CheckArgs, mut stdin: R) -> anyhow::Result<ToolCallEvent> {
    if let Some(src) = &args.event {
        let raw = if src == "-" {
            let mut s = String::new();
            stdin.read_to_string(&mut s).context("failed to read event from stdin")?;
            s
        } else {
            std::fs::read_to_string(src).with_context(|| format!("failed to read event file {src}"))?
        };
        return serde_json::from_str(&raw).context("invalid tool call event");
    }

    let Some(tool) = &args.tool else {
        bail!("either --event or --tool is required");
    };
    let params = match &args.params {
        Some(raw) => parse_params(raw)?,
        None => Map::new(),
    };
    Ok(ToolCallEvent::new(tool.clone(), params))
}

fn parse_params(raw: &str) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).context("--params is not valid JSON")? {
        Value::Object(m) => Ok(m),
        other => bail!("--params must be a JSON object, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn args(event: Option<&str>, tool: Option<&str>, params: Option<&str>) -> CheckArgs {
        CheckArgs {
            config: None,
            event: event.map(str::to_string),
            tool: tool.map(str::to_string),
            params: params.map(str::to_string),
        }
    }

    #[test]
    fn test_tool_and_params() {
        let ev = read_event(
            &args(None, Some("exec"), Some(r#"{"cmd":"ls","cwd":"/"}"#)),
            std::io::empty(),
        )
        .unwrap();
        assert_eq!(ev.tool_name, "exec");
        assert_eq!(
            serde_json::to_string(&ev.params).unwrap(),
            r#"{"cmd":"ls","cwd":"/"}"#
        );
    }

    #[test]
    fn test_tool_without_params() {
        let ev = read_event(&args(None, Some("noop"), None), std::io::empty()).unwrap();
        assert!(ev.params.is_empty());
    }

    #[test]
    fn test_params_must_be_object() {
        let err = read_event(&args(None, Some("exec"), Some("[1,2]")), std::io::empty()).unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }

    #[test]
    fn test_event_from_stdin() {
        let stdin = r#"{"toolName":"read_file","params":{"path":"/etc/passwd"}}"#.as_bytes();
        let ev = read_event(&args(Some("-"), None, None), stdin).unwrap();
        assert_eq!(ev.tool_name, "read_file");
        assert_eq!(ev.params["path"], "/etc/passwd");
    }

    #[test]
    fn test_event_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"toolName":"run"}}"#).unwrap();
        let path = f.path().to_string_lossy().to_string();
        let ev = read_event(&args(Some(&path), None, None), std::io::empty()).unwrap();
        assert_eq!(ev.tool_name, "run");
    }

    #[tokio::test]
    async fn test_unconfigured_plugin_allows() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "timeoutMs = 100").unwrap();
        let mut a = args(None, Some("exec"), Some("{}"));
        a.config = Some(f.path().to_path_buf());

        let decision = check_with_env(a, |_| None).await.unwrap();
        assert_eq!(decision, GateDecision::Allow);
    }

    #[tokio::test]
    async fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(None, Some("exec"), None);
        a.config = Some(dir.path().join("absent.toml"));

        let err = check_with_env(a, |_| None).await.unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
