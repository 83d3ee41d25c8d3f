//! Configuration types for the coaching backend.
//!
//! Everything is loadable from a single TOML file with per-section defaults,
//! so a missing or partial config file still yields a runnable service.
//! Credentials are referenced indirectly via [`SecretRef`] rather than being
//! required inline.

use crate::error::{CoachError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for the coaching service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Completion provider settings.
    pub llm: LlmConfig,
    /// Text-to-speech settings.
    pub tts: TtsConfig,
    /// Speech-to-text settings.
    pub stt: SttConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind (0 = auto-assign).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
        }
    }
}

/// Secret reference used for provider API keys.
///
/// Inline literals are supported but discouraged; prefer `env` so the key
/// never lands in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretRef {
    /// No API key (local or unauthenticated servers).
    #[default]
    None,
    /// Inline literal key.
    Literal { value: String },
    /// Resolve the key from an environment variable.
    Env { var: String },
}

impl SecretRef {
    /// Resolve the secret to a concrete value.
    ///
    /// `None` resolves to `Ok(None)`. An `env` reference whose variable is
    /// missing or empty is a configuration error, not an empty key.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::Config`] if the referenced value cannot be
    /// resolved.
    pub fn resolve(&self) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Literal { value } => Ok(Some(value.clone())),
            Self::Env { var } => {
                let value = std::env::var(var).map_err(|_| {
                    CoachError::Config(format!("secret env var is missing: {var}"))
                })?;
                if value.trim().is_empty() {
                    return Err(CoachError::Config(format!("secret env var is empty: {var}")));
                }
                Ok(Some(value))
            }
        }
    }

    /// Resolve leniently: a missing env var becomes `None` instead of an
    /// error. Used at startup so the server can come up degraded and report
    /// the dependent endpoint as unavailable.
    #[must_use]
    pub fn resolve_or_none(&self) -> Option<String> {
        self.resolve().ok().flatten()
    }
}

/// Completion provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API server.
    pub api_url: String,
    /// Model name to request.
    pub api_model: String,
    /// API key reference.
    pub api_key: SecretRef,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens to generate per reply.
    pub max_tokens: usize,
    /// How many history turns to include when building the prompt.
    ///
    /// The cap applies at prompt-build time only; the caller-owned history
    /// itself is never truncated by the server.
    pub history_window: usize,
    /// Optional free-text add-on appended after the coach persona.
    pub system_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai".to_owned(),
            api_model: "llama-3.3-70b-versatile".to_owned(),
            api_key: SecretRef::Env {
                var: "GROQ_API_KEY".to_owned(),
            },
            temperature: 0.7,
            max_tokens: 1500,
            history_window: 10,
            system_prompt: String::new(),
        }
    }
}

/// Which text-to-speech engine to use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsEngineKind {
    /// Google Translate TTS endpoint (MP3 output).
    #[default]
    Gtranslate,
    /// OpenAI-compatible `/v1/audio/speech` server (WAV output).
    SpeechApi,
}

/// Text-to-speech configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Which synthesis engine to use.
    pub engine: TtsEngineKind,
    /// Base URL for the `speech_api` engine.
    pub api_url: String,
    /// Model name for the `speech_api` engine.
    pub api_model: String,
    /// Voice name for the `speech_api` engine.
    pub voice: String,
    /// API key reference for the `speech_api` engine.
    pub api_key: SecretRef,
    /// Default language code when a request does not specify one.
    pub default_language: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            engine: TtsEngineKind::default(),
            api_url: "http://127.0.0.1:8880".to_owned(),
            api_model: "tts-1".to_owned(),
            voice: "alloy".to_owned(),
            api_key: SecretRef::None,
            default_language: "en".to_owned(),
        }
    }
}

/// Which speech-to-text engine to use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SttEngineKind {
    /// OpenAI-compatible `/v1/audio/transcriptions` server.
    #[default]
    SpeechApi,
    /// In-process model behind the single-flight harness.
    Local,
}

/// Speech-to-text configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Which transcription engine to use.
    pub engine: SttEngineKind,
    /// Base URL for the `speech_api` engine.
    pub api_url: String,
    /// Model name for the `speech_api` engine.
    pub api_model: String,
    /// API key reference for the `speech_api` engine.
    pub api_key: SecretRef,
    /// Optional language hint forwarded to the engine.
    pub language: Option<String>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            engine: SttEngineKind::default(),
            api_url: "https://api.groq.com/openai".to_owned(),
            api_model: "whisper-large-v3".to_owned(),
            api_key: SecretRef::Env {
                var: "GROQ_API_KEY".to_owned(),
            },
            language: None,
        }
    }
}

impl CoachConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CoachError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoachError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path (`config_dir/fitbot/config.toml`).
    ///
    /// The directory can be overridden with the `FITBOT_CONFIG_DIR`
    /// environment variable.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        let dir = if let Some(override_dir) = std::env::var_os("FITBOT_CONFIG_DIR") {
            PathBuf::from(override_dir)
        } else {
            dirs::config_dir()
                .map(|d| d.join("fitbot"))
                .unwrap_or_else(|| PathBuf::from("/tmp/fitbot-config"))
        };
        dir.join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    struct EnvGuard {
        key: &'static str,
        old: Option<std::ffi::OsString>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let old = std::env::var_os(key);
            unsafe { std::env::set_var(key, value) };
            Self { key, old }
        }

        fn unset(key: &'static str) -> Self {
            let old = std::env::var_os(key);
            unsafe { std::env::remove_var(key) };
            Self { key, old }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old {
                Some(v) => unsafe { std::env::set_var(self.key, v) },
                None => unsafe { std::env::remove_var(self.key) },
            }
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = CoachConfig::default();
        assert!(!config.server.host.is_empty());
        assert!(!config.llm.api_url.is_empty());
        assert!(!config.llm.api_model.is_empty());
        assert!(config.llm.max_tokens > 0);
        assert!(config.llm.temperature >= 0.0);
        assert!(config.llm.history_window > 0);
        assert!(!config.tts.default_language.is_empty());
        assert!(!config.stt.api_model.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = CoachConfig::default();
        config.server.port = 9123;
        config.llm.history_window = 5;
        config.tts.engine = TtsEngineKind::SpeechApi;
        config.save_to_file(&path).unwrap();

        let loaded = CoachConfig::from_file(&path).unwrap();
        assert_eq!(loaded.server.port, 9123);
        assert_eq!(loaded.llm.history_window, 5);
        assert_eq!(loaded.tts.engine, TtsEngineKind::SpeechApi);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = CoachConfig::from_file(std::path::Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        let result = CoachConfig::from_file(&path);
        assert!(matches!(result, Err(CoachError::Config(_))));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4242\n").unwrap();

        let loaded = CoachConfig::from_file(&path).unwrap();
        assert_eq!(loaded.server.port, 4242);
        assert_eq!(loaded.llm.api_model, "llama-3.3-70b-versatile");
        assert_eq!(loaded.llm.history_window, 10);
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = CoachConfig::default_config_path();
        assert!(path.ends_with("config.toml") || path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn secret_env_resolves() {
        let _env = EnvGuard::set("FITBOT_TEST_KEY", "secret-123");
        let secret = SecretRef::Env {
            var: "FITBOT_TEST_KEY".to_owned(),
        };
        assert_eq!(secret.resolve().unwrap(), Some("secret-123".to_owned()));
    }

    #[test]
    fn secret_env_missing_errors() {
        let _env = EnvGuard::unset("FITBOT_TEST_KEY_MISSING");
        let secret = SecretRef::Env {
            var: "FITBOT_TEST_KEY_MISSING".to_owned(),
        };
        assert!(secret.resolve().is_err());
        assert!(secret.resolve_or_none().is_none());
    }

    #[test]
    fn secret_none_resolves_to_none() {
        assert_eq!(SecretRef::None.resolve().unwrap(), None);
    }

    #[test]
    fn secret_literal_round_trips_through_toml() {
        let secret = SecretRef::Literal {
            value: "sk-test".to_owned(),
        };
        let toml_str = toml::to_string(&secret).unwrap();
        let parsed: SecretRef = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, secret);
    }
}
