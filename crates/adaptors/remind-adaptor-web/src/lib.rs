//! Re:Mind web adaptor
//!
//! The server half of Re:Mind: a forwarding gateway that accepts a chat
//! history on `POST /api/chat`, relays it to the configured upstream agent
//! with a bearer token, and returns the agent's reply as plain text.
//!
//! # Endpoints
//!
//! - `POST /api/chat` - relay `{ "messages": [...] }` to the agent
//! - `GET /health` - liveness probe
//!
//! # Responses
//!
//! | Situation                      | Status          | Body                       |
//! |--------------------------------|-----------------|----------------------------|
//! | agent replied 2xx              | 200             | agent body, verbatim       |
//! | `messages` not an array        | 400             | `Invalid payload: ...`     |
//! | agent URL or token missing     | 500             | `Missing ... on server.`   |
//! | agent replied non-2xx          | agent's status  | `Agent error: <detail>`    |
//! | anything else                  | 500             | `Error: <message>`         |
//!
//! # Example
//!
//! ```no_run
//! use remind_adaptor_web::{ChatGateway, GatewayConfig, GatewayServer, GatewayServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> remind_core::Result<()> {
//!     let gateway = ChatGateway::new(GatewayConfig::from_env());
//!     let mut server = GatewayServer::new(GatewayServerConfig::default(), gateway);
//!     server.start().await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.stop().await
//! }
//! ```

pub mod error;
pub mod gateway;
pub mod server;

pub use error::{GatewayError, TEXT_PLAIN_UTF8};
pub use gateway::{chat_handler, ChatGateway, GatewayConfig, RelayMode};
pub use server::{build_router, GatewayServer, GatewayServerConfig};
