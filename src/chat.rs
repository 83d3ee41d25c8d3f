//! Conversation assembly for the completion gateway.
//!
//! The caller owns the full conversation history and sends it with every
//! request; the server holds no conversational state between requests. Phase
//! tracking for the interview flow lives entirely in the transcript plus the
//! persona text — there is deliberately no phase enum here, and the
//! completion model infers where the conversation stands from the prompt
//! alone.

use serde::{Deserialize, Serialize};

/// A prompt-side message with a guaranteed role and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// `system`, `user`, or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl Turn {
    /// Build a system turn.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_owned(),
            content: content.into(),
        }
    }

    /// Build a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_owned(),
            content: content.into(),
        }
    }

    /// Build an assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_owned(),
            content: content.into(),
        }
    }
}

/// A caller-supplied history entry. Either field may be absent; malformed
/// entries are echoed back unchanged but skipped at prompt-build time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    /// Message role, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Message text, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl HistoryTurn {
    fn well_formed(&self) -> Option<Turn> {
        match (&self.role, &self.content) {
            (Some(role), Some(content)) => Some(Turn {
                role: role.clone(),
                content: content.clone(),
            }),
            _ => None,
        }
    }
}

impl From<Turn> for HistoryTurn {
    fn from(turn: Turn) -> Self {
        Self {
            role: Some(turn.role),
            content: Some(turn.content),
        }
    }
}

/// Build the ordered prompt for a completion request.
///
/// The persona always comes first as the system turn, followed by at most
/// the last `window` well-formed history turns (relative order preserved,
/// malformed entries silently skipped), followed by the new user message.
#[must_use]
pub fn build_prompt(
    persona: &str,
    history: &[HistoryTurn],
    message: &str,
    window: usize,
) -> Vec<Turn> {
    let mut prompt = Vec::with_capacity(window + 2);
    prompt.push(Turn::system(persona));

    let start = history.len().saturating_sub(window);
    prompt.extend(history[start..].iter().filter_map(HistoryTurn::well_formed));

    prompt.push(Turn::user(message));
    prompt
}

/// Append the new exchange to the caller's history.
///
/// Pure append: the first `history.len()` entries of the result are the
/// input unchanged, followed by the user turn then the assistant turn. No
/// cap is applied here — unbounded growth is the caller's responsibility,
/// and the window cap applies only at prompt-build time.
#[must_use]
pub fn extend_history(history: &[HistoryTurn], message: &str, reply: &str) -> Vec<HistoryTurn> {
    let mut updated = Vec::with_capacity(history.len() + 2);
    updated.extend_from_slice(history);
    updated.push(Turn::user(message).into());
    updated.push(Turn::assistant(reply).into());
    updated
}
