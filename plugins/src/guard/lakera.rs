use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde_json::Value;

use lakera_guard_core::api::{GateDecision, Settings, ToolCallEvent};

use super::error::GuardError;
use super::models::{GuardMessage, GuardRequest, GuardVerdict};

pub const LAKERA_GUARD_URL: &str = "https://api.lakera.ai/v2/guard";

pub const FLAGGED_REASON: &str = "Tool call flagged by Lakera Guard";

const BODY_SNIPPET_MAX: usize = 2048;

/// Client for Lakera Guard `/v2/guard`.
///
/// Each call builds its own request and timer, so overlapping calls for
/// different tool invocations share nothing but the connection pool.
pub struct LakeraGuardClient {
    http: reqwest::Client,
    endpoint: String,
    settings: Settings,
}

impl LakeraGuardClient {
    pub fn new(settings: Settings) -> Result<Self, GuardError> {
        Self::with_endpoint(settings, LAKERA_GUARD_URL)
    }

    pub fn with_endpoint(settings: Settings, endpoint: impl Into<String>) -> Result<Self, GuardError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(GuardError::Client)?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_request(&self, event: &ToolCallEvent) -> Result<GuardRequest, GuardError> {
        let message = GuardMessage::assistant_tool_call(event).map_err(GuardError::Encode)?;
        Ok(GuardRequest {
            messages: vec![message],
            project_id: self.settings.effective_project_id().map(str::to_string),
        })
    }

    /// A key that already carries the `Bearer ` scheme is sent as is.
    pub fn authorization_header(&self) -> String {
        let key = self.settings.api_key.expose_secret();
        if key.starts_with("Bearer ") {
            key.to_string()
        } else {
            format!("Bearer {key}")
        }
    }

    /// Screens one tool call. Exactly one POST is issued; it is dropped,
    /// and the connection aborted, once `timeout_ms` elapses.
    pub async fn classify(&self, event: &ToolCallEvent) -> Result<GuardVerdict, GuardError> {
        let body = serde_json::to_vec(&self.build_request(event)?).map_err(GuardError::Encode)?;
        let timeout_ms = self.settings.timeout_ms;

        match tokio::time::timeout(Duration::from_millis(timeout_ms), self.send(body)).await {
            Ok(result) => result,
            Err(_) => Err(GuardError::Timeout { timeout_ms }),
        }
    }

    async fn send(&self, body: Vec<u8>) -> Result<GuardVerdict, GuardError> {
        let res = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.authorization_header())
            .body(body)
            .send()
            .await
            .map_err(GuardError::Transport)?;

        let status = res.status();
        let text = res.text().await.map_err(GuardError::Transport)?;
        if !status.is_success() {
            return Err(GuardError::HttpStatus {
                status: status.as_u16(),
                body: body_snippet(&text),
            });
        }

        let value: Value = serde_json::from_str(&text).map_err(GuardError::Decode)?;
        let verdict = GuardVerdict::from_value(&value);
        tracing::debug!(
            target: "lakera_guard.client",
            flagged = verdict.flagged,
            request_uuid = verdict.request_uuid.as_deref().unwrap_or("-"),
            "guard verdict"
        );
        Ok(verdict)
    }
}

/// `Block` only for a flagged verdict.
pub fn decide(verdict: &GuardVerdict) -> GateDecision {
    if verdict.flagged {
        GateDecision::block(FLAGGED_REASON)
    } else {
        GateDecision::Allow
    }
}

fn body_snippet(s: &str) -> String {
    if s.len() <= BODY_SNIPPET_MAX {
        return s.to_string();
    }
    let end = s
        .char_indices()
        .take_while(|(i, _)| *i < BODY_SNIPPET_MAX)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let mut out = s[..end].to_string();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn event(tool: &str, params: Value) -> ToolCallEvent {
        let params = match params {
            Value::Object(m) => m,
            other => panic!("params must be an object, got {other}"),
        };
        ToolCallEvent::new(tool, params)
    }

    fn client(settings: Settings) -> LakeraGuardClient {
        LakeraGuardClient::new(settings).unwrap()
    }

    #[test]
    fn test_request_body_is_compact_and_ordered() {
        let c = client(Settings::new("k"));
        let req = c
            .build_request(&event(
                "get_weather",
                json!({ "units": "metric", "location": "London" }),
            ))
            .unwrap();

        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"messages":[{"role":"assistant","content":"","tool_calls":[{"name":"get_weather","arguments":"{\"units\":\"metric\",\"location\":\"London\"}"}]}]}"#
        );
    }

    #[test]
    fn test_nested_params_serialize_compactly() {
        let c = client(Settings::new("k"));
        let req = c
            .build_request(&event(
                "exec",
                json!({ "cmd": "ls", "opts": { "all": true, "depth": 2 }, "env": [] }),
            ))
            .unwrap();

        assert_eq!(req.messages.len(), 1);
        assert_eq!(
            req.messages[0].tool_calls[0].arguments,
            r#"{"cmd":"ls","opts":{"all":true,"depth":2},"env":[]}"#
        );
    }

    #[test]
    fn test_float_params_format_like_json_stringify() {
        let c = client(Settings::new("k"));
        let req = c
            .build_request(&event(
                "resize",
                json!({ "count": 1.0, "big": 1e3, "huge": 1e21, "zero": -0.0, "ratio": 0.5 }),
            ))
            .unwrap();

        assert_eq!(
            req.messages[0].tool_calls[0].arguments,
            r#"{"count":1,"big":1000,"huge":1e+21,"zero":0,"ratio":0.5}"#
        );
    }

    #[test]
    fn test_empty_params() {
        let c = client(Settings::new("k"));
        let req = c.build_request(&event("run", json!({}))).unwrap();
        assert_eq!(req.messages[0].tool_calls[0].arguments, "{}");
        assert_eq!(req.messages[0].content, "");
        assert_eq!(req.messages[0].role, "assistant");
    }

    #[test]
    fn test_project_id_trimmed_or_omitted() {
        let mut s = Settings::new("k");
        s.project_id = Some("  proj-123 ".to_string());
        let req = client(s).build_request(&event("run", json!({}))).unwrap();
        assert_eq!(req.project_id.as_deref(), Some("proj-123"));
        assert_eq!(
            serde_json::to_value(&req).unwrap()["project_id"],
            json!("proj-123")
        );

        let mut s = Settings::new("k");
        s.project_id = Some("   ".to_string());
        let req = client(s).build_request(&event("run", json!({}))).unwrap();
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("project_id").is_none());
    }

    #[test]
    fn test_authorization_header() {
        assert_eq!(
            client(Settings::new("test-key")).authorization_header(),
            "Bearer test-key"
        );
        assert_eq!(
            client(Settings::new("Bearer test-key")).authorization_header(),
            "Bearer test-key"
        );
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(client(Settings::new("k")).endpoint(), LAKERA_GUARD_URL);
    }

    #[test]
    fn test_decide() {
        let flagged = GuardVerdict {
            flagged: true,
            request_uuid: None,
        };
        assert_eq!(decide(&flagged), GateDecision::block(FLAGGED_REASON));
        assert_eq!(decide(&GuardVerdict::default()), GateDecision::Allow);
    }

    #[test]
    fn test_body_snippet_truncates_on_char_boundary() {
        let long = "é".repeat(BODY_SNIPPET_MAX);
        let s = body_snippet(&long);
        assert!(s.ends_with('…'));
        assert!(s.len() <= BODY_SNIPPET_MAX + 'é'.len_utf8() + '…'.len_utf8());
        assert_eq!(body_snippet("short"), "short");
    }
}
