//! Re:Mind Core
//!
//! Client-side building blocks for the Re:Mind memory & to-do chat:
//!
//! - Conversation store with a single-writer submit lifecycle
//! - Snapshot subscription for renderers
//! - Chat transport to the `/api/chat` forwarding gateway
//! - Speech engine seam for reading replies aloud
//! - Environment-driven configuration and logging
//!
//! # Example
//!
//! ```no_run
//! use remind_core::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let transport = Arc::new(HttpChatTransport::new(DEFAULT_GATEWAY_URL));
//!     let store = ConversationStore::new(transport);
//!
//!     store.update_input("add buy milk");
//!     store.submit().await;
//!
//!     for message in &store.snapshot().messages {
//!         println!("{}: {}", message.role, message.content);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export commonly used types
pub use uuid::Uuid;

pub mod config;
pub mod conversation;
pub mod error;
pub mod speech;
pub mod transport;
pub mod types;
pub mod utils;

pub use config::{
    get_env_bool, get_env_int, get_env_or, get_optional_env, load_env, AGENT_TOKEN_ENV,
    AGENT_URL_ENV, CORS_ENV, DEFAULT_GATEWAY_URL, GATEWAY_URL_ENV, HOST_ENV, LOG_LEVEL_ENV,
    PORT_ENV, SPEECH_COMMAND_ENV, STREAM_RELAY_ENV,
};
pub use conversation::{ConversationStore, SubmitOutcome};
pub use error::{RemindError, Result};
pub use speech::{SpeechEngine, Utterance};
pub use transport::{ChatTransport, HttpChatTransport};
pub use types::*;
pub use utils::{init_logging, scrub_message};
