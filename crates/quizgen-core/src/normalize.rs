//! Cleanup of raw extracted text into plain prose.

use crate::rules::TextRules;

/// Normalize raw extracted text.
///
/// In order: bullet glyphs become spaces, runs of horizontal whitespace
/// collapse to one space, ASCII control characters (other than tab and
/// newline) are removed, whitespace hugging a newline is dropped, and the
/// result is trimmed. Never fails; the result may be empty.
pub fn normalize_text(rules: &TextRules, raw: &str) -> String {
    let text = rules.bullets.replace_all(raw, " ");
    let text = rules.horizontal_runs.replace_all(&text, " ");
    let text = rules.control_chars.replace_all(&text, "");
    let text = rules.newline_padding.replace_all(&text, "\n");
    text.trim().to_string()
}
