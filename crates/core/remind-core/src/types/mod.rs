//! Core type definitions for Re:Mind

pub mod message;
pub mod state;

pub use message::*;
pub use state::*;
