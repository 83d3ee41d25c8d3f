//! FitBot: conversational fitness-coaching backend.
//!
//! This crate brokers chat between HTTP clients and an OpenAI-compatible
//! completion provider, wrapped in a fitness-coach persona, and layers on
//! deterministic extras:
//!
//! - **Tutorial matching**: scans conversation text for known exercise names
//!   and attaches curated video links
//! - **Speech sanitization**: strips markdown and pictographs so TTS output
//!   reads cleanly
//! - **Audio gateways**: pluggable TTS and STT engines behind trait seams,
//!   selected by configuration
//!
//! The service is stateless: callers own their conversation history and ship
//! it with every request.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod sanitize;
pub mod server;
pub mod stt;
pub mod tts;

pub use catalog::ExerciseCatalog;
pub use config::CoachConfig;
pub use error::{CoachError, Result};
pub use server::{AppState, router, serve};
