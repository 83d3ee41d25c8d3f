//! Speech-safe text sanitization.
//!
//! Assistant replies may carry lightweight markdown and decorative symbols
//! that read fine on screen but garble TTS output. [`sanitize_for_speech`]
//! deletes pictographic code points first, then strips markup in a fixed
//! order (bold before italic before the generic emphasis sweep, so `**bold**`
//! is never mis-parsed as two italic spans), and finally trims. One pass
//! leaves no residual markup, so the function is idempotent for single-level
//! markup.

use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// Pictographic/symbol code point ranges deleted outright.
const PICTOGRAPH_RANGES: &[RangeInclusive<u32>] = &[
    0x1F600..=0x1F64F, // emoticons
    0x1F300..=0x1F5FF, // symbols & pictographs
    0x1F680..=0x1F6FF, // transport & map symbols
    0x1F1E0..=0x1F1FF, // flags
    0x2700..=0x27BF,   // dingbats
    0x1F900..=0x1F9FF, // supplemental symbols and pictographs
    0x2600..=0x26FF,   // misc symbols
    0x2B00..=0x2BFF,   // misc symbols & arrows
    0x1FA70..=0x1FAFF, // extended pictographic
];

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("static regex"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("static regex"));
static EMPHASIS_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_]+").expect("static regex"));
static HEADINGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#+").expect("static regex"));
static LINKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("static regex"));
static CODE_SPANS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`+").expect("static regex"));

fn is_pictograph(c: char) -> bool {
    let cp = c as u32;
    PICTOGRAPH_RANGES.iter().any(|r| r.contains(&cp))
}

/// Delete all pictographic code points. No substitution character is
/// inserted.
#[must_use]
pub fn strip_pictographs(text: &str) -> String {
    text.chars().filter(|c| !is_pictograph(*c)).collect()
}

/// Produce speech-safe plain text from assistant output.
///
/// Pictograph removal runs before markdown stripping so markup patterns
/// still match once the symbol bytes are gone.
#[must_use]
pub fn sanitize_for_speech(text: &str) -> String {
    let text = strip_pictographs(text);
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = EMPHASIS_RUNS.replace_all(&text, "");
    let text = HEADINGS.replace_all(&text, "");
    let text = LINKS.replace_all(&text, "$1");
    let text = CODE_SPANS.replace_all(&text, "");
    text.trim().to_owned()
}
