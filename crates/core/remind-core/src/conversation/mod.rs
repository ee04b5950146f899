//! Conversation store
//!
//! Owns the linear chat history and the submission lifecycle:
//!
//! ```text
//! Idle --submit--> Submitting --reply--> Idle
//!                            \--error--> Idle (last_error set)
//! ```
//!
//! Every mutation publishes a fresh [`ConversationSnapshot`] on a
//! `tokio::sync::watch` channel. Renderers subscribe and redraw on change;
//! they never touch the state directly.

use crate::speech::{SpeechEngine, Utterance};
use crate::transport::ChatTransport;
use crate::types::{ConversationSnapshot, ConversationState, ForwardRequest, Message};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};


/// What a call to [`ConversationStore::submit`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty or a submission was already in flight
    Ignored,
    /// The assistant reply was appended
    Replied,
    /// The gateway call failed; `last_error` is set
    Failed,
}

/// Single-writer owner of the conversation
pub struct ConversationStore {
    state: RwLock<ConversationState>,
    transport: Arc<dyn ChatTransport>,
    speech: Option<Arc<dyn SpeechEngine>>,
    snapshots: watch::Sender<ConversationSnapshot>,
}

impl ConversationStore {
    /// Create an empty store that submits through `transport`
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        let (snapshots, _rx) = watch::channel(Arc::new(ConversationState::default()));
        Self {
            state: RwLock::new(ConversationState::default()),
            transport,
            speech: None,
            snapshots,
        }
    }

    /// Attach a speech engine used by [`speak_last`](Self::speak_last)
    pub fn with_speech(mut self, speech: Arc<dyn SpeechEngine>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Seed the history, e.g. with a system message
    pub fn with_history(self, messages: Vec<Message>) -> Self {
        self.mutate(|state| state.messages = messages);
        self
    }

    /// Current state
    pub fn snapshot(&self) -> ConversationSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Observe every published snapshot (latest value wins)
    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.snapshots.subscribe()
    }

    /// Replace the pending input
    pub fn update_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|state| state.pending_input = text);
    }

    /// Send the pending input to the gateway.
    ///
    /// No-op while another submission is in flight or when the input is
    /// blank. On failure the user message stays in the history and no
    /// assistant message is added; nothing is retried.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(request) = self.begin_submission() else {
            return SubmitOutcome::Ignored;
        };

        match self.transport.send(request).await {
            Ok(reply) => {
                debug!("Assistant replied with {} bytes", reply.len());
                self.mutate(|state| {
                    state.messages.push(Message::assistant(reply));
                    state.is_loading = false;
                });
                SubmitOutcome::Replied
            }
            Err(e) => {
                warn!("Chat submission failed: {}", e);
                let message = e.user_message();
                self.mutate(|state| {
                    state.last_error = Some(message);
                    state.is_loading = false;
                });
                SubmitOutcome::Failed
            }
        }
    }

    /// Read the latest assistant reply aloud.
    ///
    /// Returns whether the speech engine was invoked. Engine failures are
    /// logged and otherwise ignored.
    pub async fn speak_last(&self) -> bool {
        let text = {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            state
                .last_assistant()
                .map(|m| m.content.clone())
                .filter(|content| !content.is_empty())
        };
        let (Some(text), Some(engine)) = (text, self.speech.as_ref()) else {
            return false;
        };
        if !engine.is_available() {
            debug!("Speech engine unavailable, skipping readout");
            return false;
        }
        if let Err(e) = engine.speak(Utterance::new(text)).await {
            debug!("Speech failed: {}", e);
        }
        true
    }

    /// Append the user message and flip to loading, or `None` if the
    /// preconditions fail
    fn begin_submission(&self) -> Option<ForwardRequest> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.is_loading || state.pending_input.trim().is_empty() {
            return None;
        }
        let content = std::mem::take(&mut state.pending_input);
        state.messages.push(Message::user(content));
        state.is_loading = true;
        state.last_error = None;

        let request = ForwardRequest::from_history(&state.messages);
        info!("Submitting conversation with {} messages", request.messages.len());
        self.snapshots.send_replace(Arc::new(state.clone()));
        Some(request)
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut ConversationState) -> R) -> R {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut state);
        self.snapshots.send_replace(Arc::new(state.clone()));
        out
    }
}
