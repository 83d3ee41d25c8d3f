//! Speech-to-text engines.
//!
//! Transcription has three outcomes the rest of the service must keep
//! apart: a transcript, audio that was present but not understood (a valid
//! result, not an error), and a transport/engine failure. The engines live
//! behind one trait so deployment variants are a config choice.

mod local;
mod speech_api;

pub use local::{SingleFlight, SpeechModel};
pub use speech_api::SpeechApiStt;

use crate::config::{SttConfig, SttEngineKind};
use crate::error::{CoachError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Result of a transcription attempt that reached the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionOutcome {
    /// The engine derived text from the audio.
    Transcript {
        /// The transcript text.
        text: String,
        /// Detected language tag, when the engine reports one.
        language: Option<String>,
    },
    /// Audio was present but no text could be derived. Not an error.
    NotUnderstood,
}

/// Black-box audio→text conversion.
#[async_trait]
pub trait SttEngine: Send + Sync {
    /// Transcribe a WAV-contained audio upload.
    ///
    /// # Errors
    ///
    /// Transport/engine failures surface as [`CoachError::Stt`];
    /// unintelligible audio is the [`TranscriptionOutcome::NotUnderstood`]
    /// success case, never an error.
    async fn transcribe(&self, audio: Vec<u8>) -> Result<TranscriptionOutcome>;
}

/// Build the configured STT engine.
///
/// The `local` kind needs an embedding application to supply a concrete
/// [`SpeechModel`] behind [`SingleFlight`]; no neural model ships in this
/// crate, so selecting it here is a configuration error and the `/stt`
/// endpoint reports itself unavailable.
///
/// # Errors
///
/// Returns [`CoachError::Config`] when credentials cannot be resolved or
/// the engine kind has no bundled implementation.
pub fn engine_from_config(config: &SttConfig) -> Result<Arc<dyn SttEngine>> {
    match config.engine {
        SttEngineKind::SpeechApi => Ok(Arc::new(SpeechApiStt::new(config)?)),
        SttEngineKind::Local => Err(CoachError::Config(
            "no local speech model is bundled; wire one up via stt::SingleFlight".to_owned(),
        )),
    }
}
