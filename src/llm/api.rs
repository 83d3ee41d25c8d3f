//! OpenAI-compatible chat-completions client.
//!
//! Works against any server implementing the OpenAI chat completions API:
//! Groq, Ollama, vLLM, llama.cpp server, etc. Non-streaming: the `/chat`
//! contract returns one JSON body per turn, so there is nothing to stream.

use super::CompletionGateway;
use crate::chat::Turn;
use crate::config::LlmConfig;
use crate::error::{CoachError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;
use tracing::info;

/// Completion gateway backed by an OpenAI-compatible HTTP API.
pub struct ApiGateway {
    client: reqwest::Client,
    url: String,
    api_model: String,
    api_key: Option<String>,
    temperature: f64,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl ApiGateway {
    /// Create a gateway from config, resolving the API key reference.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::Config`] when the configured key reference
    /// cannot be resolved (e.g. the env var is unset). Callers treat that
    /// as a degraded-start condition, not a fatal one.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key.resolve()?;
        let url = chat_completions_url(&config.api_url);
        info!("completion gateway configured: {url} model={}", config.api_model);

        Ok(Self {
            client: reqwest::Client::new(),
            url,
            api_model: config.api_model.clone(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionGateway for ApiGateway {
    async fn complete(&self, turns: &[Turn]) -> Result<String> {
        let body = serde_json::json!({
            "model": self.api_model,
            "messages": turns,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let start = Instant::now();
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CoachError::Llm(format!("completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CoachError::Llm(format!(
                "provider returned {status}: {}",
                detail.trim()
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CoachError::Llm(format!("malformed completion response: {e}")))?;

        let reply = completion
            .choices
            .first()
            .map(|c| c.message.content.trim().to_owned())
            .ok_or_else(|| CoachError::Llm("completion response had no choices".to_owned()))?;

        info!(
            "completion of {} turns in {}ms",
            turns.len(),
            start.elapsed().as_millis()
        );
        Ok(reply)
    }
}

/// Normalize a configured base URL into the chat-completions endpoint.
///
/// Accepts bases with or without a trailing `/v1` or trailing slashes.
fn chat_completions_url(api_url: &str) -> String {
    let base = api_url.strip_suffix("/v1").unwrap_or(api_url);
    let base = base.trim_end_matches('/');
    format!("{base}/v1/chat/completions")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::config::SecretRef;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(uri: &str) -> LlmConfig {
        LlmConfig {
            api_url: uri.to_owned(),
            api_key: SecretRef::None,
            ..LlmConfig::default()
        }
    }

    #[test]
    fn url_normalization() {
        assert_eq!(
            chat_completions_url("https://api.groq.com/openai"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            chat_completions_url("http://localhost:11434/v1"),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            chat_completions_url("http://localhost:8080/"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn complete_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama-3.3-70b-versatile"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "  Hey there!  "}}]
            })))
            .mount(&server)
            .await;

        let gateway = ApiGateway::new(&config_for(&server.uri())).unwrap();
        let reply = gateway.complete(&[Turn::user("Hi")]).await.unwrap();
        assert_eq!(reply, "Hey there!");
    }

    #[tokio::test]
    async fn complete_sends_bearer_auth_when_key_present() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let mut config = config_for(&server.uri());
        config.api_key = SecretRef::Literal {
            value: "sk-test".to_owned(),
        };
        let gateway = ApiGateway::new(&config).unwrap();
        assert_eq!(gateway.complete(&[Turn::user("Hi")]).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn provider_error_status_maps_to_llm_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let gateway = ApiGateway::new(&config_for(&server.uri())).unwrap();
        let err = gateway.complete(&[Turn::user("Hi")]).await.unwrap_err();
        match err {
            CoachError::Llm(msg) => assert!(msg.contains("429") && msg.contains("rate limited")),
            other => panic!("expected Llm error, got {other}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_maps_to_llm_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let gateway = ApiGateway::new(&config_for(&server.uri())).unwrap();
        assert!(matches!(
            gateway.complete(&[Turn::user("Hi")]).await,
            Err(CoachError::Llm(_))
        ));
    }

    #[test]
    fn missing_env_key_is_config_error() {
        let mut config = config_for("http://localhost:9999");
        config.api_key = SecretRef::Env {
            var: "FITBOT_DEFINITELY_UNSET_KEY".to_owned(),
        };
        assert!(matches!(ApiGateway::new(&config), Err(CoachError::Config(_))));
    }
}
