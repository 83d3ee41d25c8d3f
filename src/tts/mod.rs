//! Text-to-speech engines.
//!
//! Synthesis is a black-box text→audio conversion; the deployment variants
//! differ only in which engine is plugged in, so the engines live behind one
//! trait and are selected by config. Callers are expected to run
//! [`crate::sanitize::sanitize_for_speech`] on assistant text before
//! synthesis.

mod gtranslate;
mod speech_api;

pub use gtranslate::GtranslateTts;
pub use speech_api::SpeechApiTts;

use crate::config::{TtsConfig, TtsEngineKind};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Container format of a synthesized clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// RIFF WAV.
    Wav,
    /// MPEG layer-3.
    Mp3,
}

impl AudioFormat {
    /// MIME type for HTTP responses.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }

    /// Conventional file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }
}

/// A synthesized audio clip in the engine's native container format.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Encoded audio bytes.
    pub bytes: bytes::Bytes,
    /// Container format of `bytes`.
    pub format: AudioFormat,
}

/// Black-box text→audio conversion.
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Synthesize speech for already-sanitized text.
    ///
    /// # Errors
    ///
    /// Any transport or engine error surfaces as [`crate::error::CoachError::Tts`].
    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioClip>;
}

/// Build the configured TTS engine.
///
/// # Errors
///
/// Returns [`crate::error::CoachError::Config`] when the engine's
/// credentials cannot be resolved.
pub fn engine_from_config(config: &TtsConfig) -> Result<Arc<dyn TtsEngine>> {
    match config.engine {
        TtsEngineKind::Gtranslate => Ok(Arc::new(GtranslateTts::new())),
        TtsEngineKind::SpeechApi => Ok(Arc::new(SpeechApiTts::new(config)?)),
    }
}
