//! Configuration management and environment variable loading

use crate::{RemindError, Result};
use std::env;

/// Upstream agent endpoint the gateway relays to
pub const AGENT_URL_ENV: &str = "SUPABASE_AGENT_URL";

/// Bearer token sent to the upstream agent
pub const AGENT_TOKEN_ENV: &str = "SUPABASE_ANON_KEY";

/// Gateway bind host
pub const HOST_ENV: &str = "REMIND_HOST";

/// Gateway bind port
pub const PORT_ENV: &str = "REMIND_PORT";

/// Pipe upstream bytes through instead of buffering the whole reply
pub const STREAM_RELAY_ENV: &str = "REMIND_STREAM_RELAY";

/// Chat endpoint used by clients
pub const GATEWAY_URL_ENV: &str = "REMIND_GATEWAY_URL";

/// Permissive CORS on the gateway router
pub const CORS_ENV: &str = "REMIND_CORS";

/// TTS command line used by the terminal client's `/speak`
pub const SPEECH_COMMAND_ENV: &str = "REMIND_SPEECH_COMMAND";

/// Log filter fallback when `RUST_LOG` is unset
pub const LOG_LEVEL_ENV: &str = "REMIND_LOG_LEVEL";

/// Default chat endpoint for clients running next to the gateway
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000/api/chat";

/// Load environment variables from .env file
///
/// Looks in the current directory and its parents. A missing file is not an
/// error; a malformed one is.
///
/// # Example
///
/// ```no_run
/// use remind_core::load_env;
///
/// load_env().ok();
/// let agent_url = std::env::var("SUPABASE_AGENT_URL").unwrap_or_default();
/// ```
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(RemindError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(RemindError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Get environment variable, treating an empty value as unset
pub fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as boolean
pub fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
