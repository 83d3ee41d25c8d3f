//! Single-flight harness for in-process speech models.
//!
//! A local neural transcription model is a heavyweight handle: loading it
//! takes seconds and holds significant memory. The lifecycle here is load
//! on use, release after use, with the whole load→transcribe→release cycle
//! behind one async mutex. Concurrent requests queue on the mutex instead
//! of racing the lifecycle, so the handle can neither double-load nor be
//! released while another request is mid-transcription.
//!
//! The concrete model stays outside this crate; embedders implement
//! [`SpeechModel`] over their engine and hand the loader to
//! [`SingleFlight::new`].

use super::{SttEngine, TranscriptionOutcome};
use crate::error::{CoachError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// A blocking in-process transcription model.
pub trait SpeechModel: Send + 'static {
    /// Transcribe a WAV-contained audio clip.
    ///
    /// # Errors
    ///
    /// Engine failures surface as [`CoachError::Stt`]; unintelligible audio
    /// is [`TranscriptionOutcome::NotUnderstood`].
    fn transcribe(&mut self, audio: &[u8]) -> Result<TranscriptionOutcome>;
}

type Loader<M> = Arc<dyn Fn() -> Result<M> + Send + Sync>;

/// Serialized lazy load / explicit release wrapper around a [`SpeechModel`].
pub struct SingleFlight<M: SpeechModel> {
    slot: Mutex<Option<M>>,
    loader: Loader<M>,
}

impl<M: SpeechModel> SingleFlight<M> {
    /// Create a harness with the given blocking loader.
    pub fn new(loader: impl Fn() -> Result<M> + Send + Sync + 'static) -> Self {
        Self {
            slot: Mutex::new(None),
            loader: Arc::new(loader),
        }
    }
}

#[async_trait]
impl<M: SpeechModel> SttEngine for SingleFlight<M> {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<TranscriptionOutcome> {
        // Held across the whole cycle: callers queue here.
        let mut slot = self.slot.lock().await;

        let mut model = match slot.take() {
            Some(model) => model,
            None => {
                info!("loading local speech model");
                let loader = Arc::clone(&self.loader);
                tokio::task::spawn_blocking(move || loader())
                    .await
                    .map_err(|e| CoachError::Stt(format!("model load task failed: {e}")))??
            }
        };

        let (model, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = model.transcribe(&audio);
            (model, outcome)
        })
        .await
        .map_err(|e| CoachError::Stt(format!("transcription task failed: {e}")))?;

        // Release after each use to bound memory; the next request reloads.
        drop(model);
        *slot = None;
        info!("released local speech model");

        outcome
    }
}
