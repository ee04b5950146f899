//! Text-to-speech seam
//!
//! Re:Mind does not synthesize audio itself; a front end supplies a
//! [`SpeechEngine`] (browser speech synthesis, a local TTS daemon, ...).

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default speaking rate, slightly faster than neutral
pub const DEFAULT_RATE: f32 = 1.02;

/// Default pitch
pub const DEFAULT_PITCH: f32 = 1.0;

/// Text plus prosody parameters for one readout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Text to read
    pub text: String,
    /// Speaking rate multiplier
    pub rate: f32,
    /// Pitch multiplier
    pub pitch: f32,
}

impl Utterance {
    /// Utterance with the default rate and pitch
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rate: DEFAULT_RATE,
            pitch: DEFAULT_PITCH,
        }
    }
}

/// External speech synthesis capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Whether the engine can speak right now
    fn is_available(&self) -> bool {
        true
    }

    /// Read the utterance aloud, interrupting anything already playing
    async fn speak(&self, utterance: Utterance) -> Result<()>;
}
