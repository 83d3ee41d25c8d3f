//! OpenAI-compatible transcription adapter.
//!
//! Uploads the WAV audio as a multipart form to `POST
//! /v1/audio/transcriptions` (OpenAI, Groq whisper, faster-whisper servers).
//! An empty transcript from the engine is reported as
//! [`TranscriptionOutcome::NotUnderstood`], not as a blank success.

use super::{SttEngine, TranscriptionOutcome};
use crate::config::SttConfig;
use crate::error::{CoachError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

/// STT engine backed by an OpenAI-compatible `/v1/audio/transcriptions` server.
pub struct SpeechApiStt {
    client: reqwest::Client,
    url: String,
    api_model: String,
    api_key: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language: Option<String>,
}

impl SpeechApiStt {
    /// Create an adapter from config, resolving the API key reference.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::Config`] when the key reference cannot be
    /// resolved.
    pub fn new(config: &SttConfig) -> Result<Self> {
        let api_key = config.api_key.resolve()?;
        let url = transcriptions_url(&config.api_url);
        info!("speech-api STT configured: {url} model={}", config.api_model);

        Ok(Self {
            client: reqwest::Client::new(),
            url,
            api_model: config.api_model.clone(),
            api_key,
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl SttEngine for SpeechApiStt {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<TranscriptionOutcome> {
        let file_part = reqwest::multipart::Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| CoachError::Stt(format!("invalid upload part: {e}")))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.api_model.clone())
            .text("response_format", "json");
        if let Some(ref language) = self.language {
            form = form.text("language", language.clone());
        }

        let mut request = self.client.post(&self.url).multipart(form);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CoachError::Stt(format!("transcription request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CoachError::Stt(format!(
                "transcription endpoint returned {status}: {}",
                detail.trim()
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| CoachError::Stt(format!("malformed transcription response: {e}")))?;

        let text = parsed.text.trim().to_owned();
        if text.is_empty() {
            return Ok(TranscriptionOutcome::NotUnderstood);
        }

        info!("transcribed {} chars", text.len());
        Ok(TranscriptionOutcome::Transcript {
            text,
            language: parsed.language,
        })
    }
}

/// Normalize a configured base URL into the transcriptions endpoint.
fn transcriptions_url(api_url: &str) -> String {
    let base = api_url.strip_suffix("/v1").unwrap_or(api_url);
    let base = base.trim_end_matches('/');
    format!("{base}/v1/audio/transcriptions")
}
