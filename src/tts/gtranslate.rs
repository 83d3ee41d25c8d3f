//! Google Translate TTS adapter.
//!
//! Calls the unauthenticated `translate_tts` endpoint (the same one the
//! gTTS library wraps) and returns MP3 audio. Good enough for short coach
//! replies; no key, no quota contract.

use super::{AudioClip, AudioFormat, TtsEngine};
use crate::error::{CoachError, Result};
use async_trait::async_trait;
use tracing::info;

const ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// TTS engine backed by the Google Translate speech endpoint.
pub struct GtranslateTts {
    client: reqwest::Client,
    endpoint: String,
}

impl GtranslateTts {
    /// Create an adapter against the production endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoint(ENDPOINT)
    }

    /// Create an adapter against a custom endpoint (tests).
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    fn request_url(&self, text: &str, language: &str) -> String {
        format!(
            "{}?ie=UTF-8&client=tw-ob&tl={}&q={}",
            self.endpoint,
            urlencoding::encode(language),
            urlencoding::encode(text)
        )
    }
}

impl Default for GtranslateTts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TtsEngine for GtranslateTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioClip> {
        if text.is_empty() {
            return Err(CoachError::Tts("nothing to synthesize".to_owned()));
        }

        let url = self.request_url(text, language);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoachError::Tts(format!("synthesis request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoachError::Tts(format!("synthesis endpoint returned {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoachError::Tts(format!("failed to read audio body: {e}")))?;

        info!("synthesized {} chars to {} bytes of mp3", text.len(), bytes.len());
        Ok(AudioClip {
            bytes,
            format: AudioFormat::Mp3,
        })
    }
}
