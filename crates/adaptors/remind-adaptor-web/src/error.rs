//! Gateway error taxonomy
//!
//! Every variant renders as a plain-text HTTP response; the gateway never
//! lets a failure escape its handler.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use remind_core::{AGENT_TOKEN_ENV, AGENT_URL_ENV};
use thiserror::Error;
use tracing::warn;

/// Content type of every gateway response
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Gateway failures, displayed exactly as the response body
#[derive(Debug, Error)]
pub enum GatewayError {
    /// `messages` missing or not an array (400)
    #[error("Invalid payload: \"messages\" must be an array.")]
    InvalidPayload,

    /// Agent URL or token not configured (500)
    #[error("Missing {url} or {token} on server.", url = AGENT_URL_ENV, token = AGENT_TOKEN_ENV)]
    MissingConfiguration,

    /// Upstream agent answered with a non-2xx status (status passed through)
    #[error("Agent error: {detail}")]
    Upstream {
        /// Upstream status code
        status: u16,
        /// Upstream body text, or its status text when unreadable
        detail: String,
    },

    /// Anything else: network failure, unparsable body (500)
    #[error("Error: {0}")]
    Internal(String),
}

/// Result alias for gateway internals
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    /// Create an internal error, substituting `Unknown error` for an empty message
    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        if msg.trim().is_empty() {
            GatewayError::Internal("Unknown error".to_string())
        } else {
            GatewayError::Internal(msg)
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidPayload => StatusCode::BAD_REQUEST,
            GatewayError::MissingConfiguration | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    /// Server-side failures the gateway itself caused. Upstream failures are
    /// logged where the agent's reply is read.
    fn is_logged_on_response(&self) -> bool {
        self.status().is_server_error() && !matches!(self, GatewayError::Upstream { .. })
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::internal(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.is_logged_on_response() {
            warn!("Gateway failure ({}): {}", status, remind_core::scrub_message(self.to_string()));
        }
        (
            status,
            [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)],
            self.to_string(),
        )
            .into_response()
    }
}
