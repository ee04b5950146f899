//! Client side of `POST /api/chat`
//!
//! The conversation store talks to the gateway only through [`ChatTransport`],
//! so tests and alternative front ends can swap the HTTP client out.

use crate::types::ForwardRequest;
use crate::{RemindError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::debug;

/// Issues one gateway call for a conversation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the full history and return the assistant's reply text
    async fn send(&self, request: ForwardRequest) -> Result<String>;
}

/// [`ChatTransport`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpChatTransport {
    /// Create a transport posting to `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: ForwardRequest) -> Result<String> {
        debug!(
            "Posting {} messages to {}",
            request.messages.len(),
            self.endpoint
        );
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "text/plain, */*")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        // A body we cannot read on an error status still counts as a failure
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(RemindError::Network(e)),
            Err(_) => String::new(),
        };

        if !status.is_success() {
            return Err(RemindError::gateway(status.as_u16(), body));
        }
        Ok(body)
    }
}
