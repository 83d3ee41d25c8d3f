//! Completion gateway abstraction.
//!
//! The language model is a black-box text-completion service: the server
//! sends an ordered turn sequence and gets one reply back. The trait seam
//! keeps providers swappable and lets tests plug in a stub gateway.

mod api;

pub use api::ApiGateway;

use crate::chat::Turn;
use crate::error::Result;
use async_trait::async_trait;

/// Black-box request/response text completion.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Generate a single completion for the given ordered turns.
    ///
    /// # Errors
    ///
    /// Any transport or provider error surfaces as [`crate::error::CoachError::Llm`].
    async fn complete(&self, turns: &[Turn]) -> Result<String>;
}
