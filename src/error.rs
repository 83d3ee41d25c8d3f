//! Error types for the coaching service.

/// Top-level error type for the fitness-coaching backend.
#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    /// Configuration error (missing credential, bad config file).
    #[error("config error: {0}")]
    Config(String),

    /// Completion provider call failed (transport, quota, malformed response).
    #[error("LLM error: {0}")]
    Llm(String),

    /// Text-to-speech synthesis error.
    #[error("TTS error: {0}")]
    Tts(String),

    /// Speech-to-text transcription error.
    #[error("STT error: {0}")]
    Stt(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, CoachError>;
