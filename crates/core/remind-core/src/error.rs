//! Error types for Re:Mind core

use thiserror::Error;

/// Main error type for Re:Mind operations
#[derive(Debug, Error)]
pub enum RemindError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The chat gateway answered with a non-success status
    #[error("Gateway returned {status}: {body}")]
    Gateway {
        /// HTTP status code returned by the gateway
        status: u16,
        /// Response body text (may be empty)
        body: String,
    },

    /// Speech synthesis error
    #[error("Speech error: {0}")]
    Speech(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using RemindError
pub type Result<T> = std::result::Result<T, RemindError>;

/// Fallback shown to the user when the gateway fails without a body
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to fetch the chat response.";

impl RemindError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        RemindError::Config(msg.into())
    }

    /// Create a gateway error
    pub fn gateway(status: u16, body: impl Into<String>) -> Self {
        RemindError::Gateway {
            status,
            body: body.into(),
        }
    }

    /// Create a speech error
    pub fn speech(msg: impl Into<String>) -> Self {
        RemindError::Speech(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        RemindError::Other(msg.into())
    }

    /// Text suitable for showing next to the conversation.
    ///
    /// Gateway failures surface the gateway's own body (it is already
    /// phrased for people, e.g. `Agent error: overloaded`).
    pub fn user_message(&self) -> String {
        match self {
            RemindError::Gateway { body, .. } if !body.trim().is_empty() => body.clone(),
            RemindError::Gateway { .. } => DEFAULT_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
