//! OpenAI-compatible speech synthesis adapter.
//!
//! Works against any server implementing `POST /v1/audio/speech` (OpenAI,
//! Kokoro-FastAPI and friends). Requests WAV output so no transcoding is
//! needed server-side.

use super::{AudioClip, AudioFormat, TtsEngine};
use crate::config::TtsConfig;
use crate::error::{CoachError, Result};
use async_trait::async_trait;
use tracing::info;

/// TTS engine backed by an OpenAI-compatible `/v1/audio/speech` server.
pub struct SpeechApiTts {
    client: reqwest::Client,
    url: String,
    api_model: String,
    voice: String,
    api_key: Option<String>,
}

impl SpeechApiTts {
    /// Create an adapter from config, resolving the API key reference.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::Config`] when the key reference cannot be
    /// resolved.
    pub fn new(config: &TtsConfig) -> Result<Self> {
        let api_key = config.api_key.resolve()?;
        let url = speech_url(&config.api_url);
        info!("speech-api TTS configured: {url} voice={}", config.voice);

        Ok(Self {
            client: reqwest::Client::new(),
            url,
            api_model: config.api_model.clone(),
            voice: config.voice.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl TtsEngine for SpeechApiTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioClip> {
        if text.is_empty() {
            return Err(CoachError::Tts("nothing to synthesize".to_owned()));
        }

        let body = serde_json::json!({
            "model": self.api_model,
            "input": text,
            "voice": self.voice,
            "language": language,
            "response_format": "wav",
        });

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CoachError::Tts(format!("synthesis request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CoachError::Tts(format!(
                "synthesis endpoint returned {status}: {}",
                detail.trim()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoachError::Tts(format!("failed to read audio body: {e}")))?;

        Ok(AudioClip {
            bytes,
            format: AudioFormat::Wav,
        })
    }
}

/// Normalize a configured base URL into the speech endpoint.
fn speech_url(api_url: &str) -> String {
    let base = api_url.strip_suffix("/v1").unwrap_or(api_url);
    let base = base.trim_end_matches('/');
    format!("{base}/v1/audio/speech")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::config::SecretRef;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn speech_url_normalization() {
        assert_eq!(
            speech_url("http://127.0.0.1:8880"),
            "http://127.0.0.1:8880/v1/audio/speech"
        );
        assert_eq!(
            speech_url("http://127.0.0.1:8880/v1"),
            "http://127.0.0.1:8880/v1/audio/speech"
        );
    }

    #[tokio::test]
    async fn synthesize_returns_wav_clip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .and(body_partial_json(serde_json::json!({
                "input": "hello",
                "voice": "alloy",
                "response_format": "wav"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF....".to_vec()))
            .mount(&server)
            .await;

        let config = TtsConfig {
            api_url: server.uri(),
            api_key: SecretRef::None,
            ..TtsConfig::default()
        };
        let tts = SpeechApiTts::new(&config).unwrap();
        let clip = tts.synthesize("hello", "en").await.unwrap();
        assert_eq!(clip.format, AudioFormat::Wav);
        assert!(clip.bytes.starts_with(b"RIFF"));
    }

    #[tokio::test]
    async fn error_status_includes_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .respond_with(ResponseTemplate::new(500).set_body_string("voice unavailable"))
            .mount(&server)
            .await;

        let config = TtsConfig {
            api_url: server.uri(),
            api_key: SecretRef::None,
            ..TtsConfig::default()
        };
        let tts = SpeechApiTts::new(&config).unwrap();
        match tts.synthesize("hello", "en").await.unwrap_err() {
            CoachError::Tts(msg) => assert!(msg.contains("voice unavailable")),
            other => panic!("expected Tts error, got {other}"),
        }
    }
}
