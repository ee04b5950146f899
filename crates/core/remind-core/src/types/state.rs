//! Conversation state owned by the store and the snapshots it publishes

use super::message::{Message, Role};
use serde::Serialize;
use std::sync::Arc;

/// Mutable conversation state. Only the conversation store writes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    /// History in append order
    pub messages: Vec<Message>,

    /// Text typed but not yet submitted
    pub pending_input: String,

    /// A submission is in flight
    pub is_loading: bool,

    /// Error from the last failed submission
    pub last_error: Option<String>,
}

impl ConversationState {
    /// Most recent assistant message, searching from the end
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
    }

    /// Whether nothing has happened yet (drives the greeting)
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && !self.is_loading && self.last_error.is_none()
    }
}

/// Immutable, cheaply cloned copy of the state handed to observers
pub type ConversationSnapshot = Arc<ConversationState>;
