//! Logging utilities

use crate::config::LOG_LEVEL_ENV;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MAX_LOGGED_CHARS: usize = 2000;

static REDACTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)bearer\s+[A-Za-z0-9._~+/=-]{8,}", "Bearer REDACTED"),
        (r"sk-[A-Za-z0-9]{20,}", "sk-REDACTED"),
        (
            r"(?i)(api[_-]?key|anon[_-]?key)\s*[:=]?\s*[A-Za-z0-9._-]{12,}",
            "api_key=REDACTED",
        ),
        (
            r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
            "email@redacted",
        ),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("redaction pattern is a valid regex"),
            replacement,
        )
    })
    .collect()
});

/// Initialize the global logging system
///
/// `RUST_LOG` wins when set; otherwise `REMIND_LOG_LEVEL`, then `info`.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string());
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Truncate and redact text before it reaches a log line.
///
/// Upstream error bodies are echoed into logs, and agents like to quote
/// credentials back.
pub fn scrub_message(mut s: String) -> String {
    if s.chars().count() > MAX_LOGGED_CHARS {
        s = s.chars().take(MAX_LOGGED_CHARS).collect();
    }
    for (re, rep) in REDACTIONS.iter() {
        s = re.replace_all(&s, *rep).into_owned();
    }
    s
}
