//! Coach persona loading.
//!
//! The system prompt is a fixed instruction blob injected as the first turn
//! of every completion request. It encodes the topic restriction, the
//! one-question-at-a-time interview protocol, the day-count matching rule
//! for generated plans, and the formatting rules. The server passes it
//! through verbatim; nothing here is generated or rewritten per request.

/// The FitBot trainer persona, compiled into the binary from
/// `prompts/coach-persona.md`.
pub const COACH_PERSONA: &str = include_str!("../prompts/coach-persona.md");

/// Assembles the system prompt from the persona and the optional user
/// add-on from config.
///
/// Empty sections are skipped so the result never ends in stray blank lines.
#[must_use]
pub fn system_prompt(user_add_on: &str) -> String {
    let add_on = user_add_on.trim();
    if add_on.is_empty() {
        COACH_PERSONA.trim().to_owned()
    } else {
        format!("{}\n\n{add_on}", COACH_PERSONA.trim())
    }
}
