//! Terminal front end
//!
//! Renders conversation snapshots as plain lines and feeds stdin into the
//! conversation store. `/speak` reads the last reply aloud, `/quit` exits.

mod speech;

pub use speech::CommandSpeechEngine;

use remind_core::{ConversationState, ConversationStore, Result, Role};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::debug;

/// Shown while the history is empty
pub const GREETING: &str = "hey, i'm your memory & to-do buddy";

/// Shown under the greeting
pub const HINT: &str =
    "try: \"remember my passport is in the top drawer\" or \"add buy milk\"";

/// Terminal adaptor configuration
#[derive(Clone, Debug)]
pub struct TerminalConfig {
    /// Line that triggers a readout of the last reply
    pub speak_command: String,
    /// Line that ends the input loop
    pub quit_command: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            speak_command: "/speak".to_string(),
            quit_command: "/quit".to_string(),
        }
    }
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit text to the agent
    Say(String),
    /// Read the last assistant reply aloud
    Speak,
    /// Stop reading input
    Quit,
}

impl TerminalConfig {
    /// Classify an input line; blank lines yield `None`
    pub fn parse(&self, line: &str) -> Option<Command> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed == self.quit_command {
            Some(Command::Quit)
        } else if trimmed == self.speak_command {
            Some(Command::Speak)
        } else {
            Some(Command::Say(line.trim_end_matches(['\r', '\n']).to_string()))
        }
    }
}

/// Lines to print when the state moves from `prev` to `next`
pub fn render(prev: &ConversationState, next: &ConversationState) -> Vec<String> {
    let mut lines = Vec::new();

    for message in next.messages.iter().skip(prev.messages.len()) {
        let speaker = match message.role {
            Role::User => "you",
            Role::Assistant => "re:mind",
            Role::System => "system",
        };
        lines.push(format!("{}> {}", speaker, message.content));
    }

    if next.is_loading && !prev.is_loading {
        lines.push("re:mind is typing...".to_string());
    }

    if next.last_error != prev.last_error {
        if let Some(error) = &next.last_error {
            lines.push(format!("error: {}", error));
        }
    }

    lines
}

/// Greeting lines for an untouched conversation
pub fn render_initial(state: &ConversationState) -> Vec<String> {
    let mut lines = Vec::new();
    if state.is_empty() {
        lines.push(GREETING.to_string());
        lines.push(HINT.to_string());
    }
    lines.extend(render(&ConversationState::default(), state));
    lines
}

/// Terminal front end bound to a conversation store
pub struct TerminalAdaptor {
    pub config: TerminalConfig,
    pub store: Arc<ConversationStore>,
}

impl TerminalAdaptor {
    pub fn new(config: TerminalConfig, store: Arc<ConversationStore>) -> Self {
        Self { config, store }
    }

    /// Print every snapshot change until the store goes away
    pub fn start_renderer(&self) -> JoinHandle<()> {
        let mut rx = self.store.subscribe();
        tokio::spawn(async move {
            let mut prev = rx.borrow_and_update().clone();
            for line in render_initial(&prev) {
                println!("{}", line);
            }
            while rx.changed().await.is_ok() {
                let next = rx.borrow_and_update().clone();
                for line in render(&prev, &next) {
                    println!("{}", line);
                }
                prev = next;
            }
        })
    }

    /// Drive the store from `input` until EOF or the quit command
    pub async fn run<R>(&self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match self.config.parse(&line) {
                None => continue,
                Some(Command::Quit) => break,
                Some(Command::Speak) => {
                    if !self.store.speak_last().await {
                        debug!("Nothing to speak");
                    }
                }
                Some(Command::Say(text)) => {
                    self.store.update_input(text);
                    let outcome = self.store.submit().await;
                    debug!("Submit finished: {:?}", outcome);
                }
            }
        }
        Ok(())
    }
}
