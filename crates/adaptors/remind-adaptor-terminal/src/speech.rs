//! Speech through an external command such as `espeak` or `say`

use async_trait::async_trait;
use remind_core::{RemindError, Result, SpeechEngine, Utterance};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::debug;

/// Words per minute at rate 1.0 for engines that take `-s`
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Speaks by spawning a TTS program with the text as its last argument.
///
/// A new utterance kills the one still playing.
pub struct CommandSpeechEngine {
    program: String,
    args: Vec<String>,
    pass_rate: bool,
    current: Mutex<Option<Child>>,
}

impl CommandSpeechEngine {
    /// Use `program` with no extra arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            pass_rate: false,
            current: Mutex::new(None),
        }
    }

    /// `espeak`, with the utterance rate mapped onto `-s`
    pub fn espeak() -> Self {
        Self {
            pass_rate: true,
            ..Self::new("espeak")
        }
    }

    /// Parse a command line like `"say -v Samantha"`
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        let mut engine = if program == "espeak" {
            Self::espeak()
        } else {
            Self::new(program)
        };
        engine.args = parts.collect();
        Some(engine)
    }

    fn command_for(&self, utterance: &Utterance) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if self.pass_rate {
            let wpm = (BASE_WORDS_PER_MINUTE * utterance.rate).round() as u32;
            command.arg("-s").arg(wpm.to_string());
        }
        command.arg(&utterance.text).kill_on_drop(true);
        command
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeechEngine {
    fn is_available(&self) -> bool {
        !self.program.is_empty()
    }

    async fn speak(&self, utterance: Utterance) -> Result<()> {
        let mut current = self.current.lock().await;
        if let Some(mut previous) = current.take() {
            // Already exited is fine
            let _ = previous.kill().await;
        }

        let child = self
            .command_for(&utterance)
            .spawn()
            .map_err(|e| RemindError::speech(format!("Failed to start {}: {}", self.program, e)))?;
        debug!("Speaking {} chars with {}", utterance.text.len(), self.program);
        *current = Some(child);
        Ok(())
    }
}
