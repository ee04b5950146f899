//! Forwarding gateway
//!
//! Validates `{ "messages": [...] }`, injects the bearer token and relays the
//! conversation to the upstream agent. The reply comes back as plain text.

use crate::error::{GatewayError, GatewayResult, TEXT_PLAIN_UTF8};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use remind_core::{get_env_bool, get_optional_env, AGENT_TOKEN_ENV, AGENT_URL_ENV, STREAM_RELAY_ENV};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a successful upstream body reaches the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelayMode {
    /// Read the whole upstream body, then answer
    #[default]
    Buffered,
    /// Pipe upstream bytes through as they arrive
    Streaming,
}

/// Upstream agent settings, injected at construction
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// Upstream agent endpoint
    pub agent_url: Option<String>,

    /// Bearer token for the agent
    pub agent_token: Option<String>,

    /// Buffered or streaming relay
    pub relay_mode: RelayMode,
}

impl GatewayConfig {
    /// Config with both credentials set and buffered relay
    pub fn new(agent_url: impl Into<String>, agent_token: impl Into<String>) -> Self {
        Self {
            agent_url: Some(agent_url.into()),
            agent_token: Some(agent_token.into()),
            relay_mode: RelayMode::Buffered,
        }
    }

    /// Read `SUPABASE_AGENT_URL`, `SUPABASE_ANON_KEY` and `REMIND_STREAM_RELAY`.
    ///
    /// Missing credentials are not an error here; requests fail with
    /// [`GatewayError::MissingConfiguration`] instead.
    pub fn from_env() -> Self {
        let relay_mode = if get_env_bool(STREAM_RELAY_ENV, false) {
            RelayMode::Streaming
        } else {
            RelayMode::Buffered
        };
        Self {
            agent_url: get_optional_env(AGENT_URL_ENV),
            agent_token: get_optional_env(AGENT_TOKEN_ENV),
            relay_mode,
        }
    }

    /// Set the relay mode
    pub fn with_relay_mode(mut self, relay_mode: RelayMode) -> Self {
        self.relay_mode = relay_mode;
        self
    }

    /// Whether both credentials are present
    pub fn is_complete(&self) -> bool {
        self.credentials().is_ok()
    }

    fn credentials(&self) -> GatewayResult<(&str, &str)> {
        let url = self.agent_url.as_deref().filter(|v| !v.trim().is_empty());
        let token = self.agent_token.as_deref().filter(|v| !v.trim().is_empty());
        match (url, token) {
            (Some(url), Some(token)) => Ok((url, token)),
            _ => Err(GatewayError::MissingConfiguration),
        }
    }
}

/// Stateless relay from `/api/chat` to the upstream agent
#[derive(Debug, Clone)]
pub struct ChatGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl ChatGateway {
    /// Create a gateway with a fresh HTTP client
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a gateway sharing an existing HTTP client
    pub fn with_client(config: GatewayConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Gateway configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Handle one chat request body. Always produces a response.
    pub async fn handle(&self, body: Bytes) -> Response {
        match self.forward(&body).await {
            Ok(response) => response,
            Err(e) => {
                if let GatewayError::Upstream { status, detail } = &e {
                    warn!(
                        "Agent returned {}: {}",
                        status,
                        remind_core::scrub_message(detail.clone())
                    );
                }
                e.into_response()
            }
        }
    }

    async fn forward(&self, body: &[u8]) -> GatewayResult<Response> {
        let messages = extract_messages(body)?;
        let (agent_url, token) = self.config.credentials()?;

        info!("Relaying {} messages to agent", messages.len());
        let upstream = self
            .client
            .post(agent_url)
            .header(reqwest::header::ACCEPT, "text/plain, */*")
            .bearer_auth(token)
            .json(&serde_json::json!({ "messages": messages }))
            .send()
            .await?;

        let status = upstream.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or_default().to_string();
            let detail = upstream.text().await.unwrap_or(status_text);
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        debug!("Agent answered {} ({:?} relay)", status, self.config.relay_mode);
        let body = match self.config.relay_mode {
            RelayMode::Buffered => Body::from(upstream.text().await?),
            RelayMode::Streaming => Body::from_stream(upstream.bytes_stream()),
        };
        Ok(plain_text(body))
    }
}

/// Pull the `messages` array out of a JSON body.
///
/// Entries are forwarded untouched; only the array shape is checked.
fn extract_messages(body: &[u8]) -> GatewayResult<Vec<JsonValue>> {
    let payload: JsonValue = serde_json::from_slice(body)?;
    match payload {
        JsonValue::Object(mut fields) => match fields.remove("messages") {
            Some(JsonValue::Array(messages)) => Ok(messages),
            _ => Err(GatewayError::InvalidPayload),
        },
        _ => Err(GatewayError::InvalidPayload),
    }
}

fn plain_text(body: Body) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)],
        body,
    )
        .into_response()
}

/// `POST /api/chat`
pub async fn chat_handler(State(gateway): State<Arc<ChatGateway>>, body: Bytes) -> Response {
    gateway.handle(body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_messages_accepts_any_array() {
        let messages = extract_messages(br#"{"messages":[1,"two",{"role":"user"}]}"#).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], serde_json::json!(1));
    }

    #[test]
    fn test_extract_messages_rejects_non_arrays() {
        for body in [
            r#"{"messages":"not-an-array"}"#,
            r#"{"messages":{"role":"user"}}"#,
            r#"{"messages":null}"#,
            r#"{}"#,
            r#"[]"#,
            r#"42"#,
            "null",
        ] {
            assert!(
                matches!(
                    extract_messages(body.as_bytes()),
                    Err(GatewayError::InvalidPayload)
                ),
                "expected invalid payload for {body}"
            );
        }
    }

    #[test]
    fn test_extract_messages_malformed_json_is_internal() {
        let err = extract_messages(b"{not json").unwrap_err();
        assert!(matches!(err, GatewayError::Internal(_)));
        assert!(err.to_string().starts_with("Error: "));
    }

    #[test]
    fn test_credentials_require_both_values() {
        assert!(GatewayConfig::new("http://agent", "anon").is_complete());
        assert!(!GatewayConfig::default().is_complete());
        assert!(!GatewayConfig {
            agent_url: Some("http://agent".into()),
            agent_token: Some(String::new()),
            ..Default::default()
        }
        .is_complete());
        assert!(!GatewayConfig {
            agent_url: None,
            agent_token: Some("anon".into()),
            ..Default::default()
        }
        .is_complete());
    }

    #[test]
    fn test_from_env_reads_relay_mode() {
        std::env::set_var(STREAM_RELAY_ENV, "true");
        let config = GatewayConfig::from_env();
        std::env::remove_var(STREAM_RELAY_ENV);
        assert_eq!(config.relay_mode, RelayMode::Streaming);
    }
}
