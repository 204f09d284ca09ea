//! Stopwords, token normalization and the compiled patterns the text
//! pipeline runs on.
//!
//! A [`TextRules`] is built once and shared by reference; nothing in the
//! pipeline mutates it, so one instance can serve any number of concurrent
//! generation calls.

use std::collections::HashSet;

use regex::Regex;

use crate::config::GeneratorConfig;

/// The built-in English stopword list.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "if", "then", "else", "when", "of", "in", "on", "for", "to",
    "from", "by", "with", "as", "at", "is", "are", "was", "were", "be", "been", "being", "that",
    "this", "these", "those", "it", "its", "into", "over", "under", "after", "before", "about",
    "via", "can", "could", "should", "would", "may", "might", "will", "shall", "do", "does", "did",
    "done", "doing", "not", "no", "nor", "so", "such", "than", "too", "very", "also", "any",
    "each", "other", "more", "most", "some", "less", "least", "own", "same", "per", "within",
    "between", "across", "up", "down", "out", "off", "above", "below", "again", "further", "once",
];

/// Bullet and list glyphs that text extraction leaves behind.
const BULLET_PATTERN: &str = "[\u{2022}\u{25CF}\u{25CB}\u{25E6}\u{25AA}\u{25AB}\u{25A0}\u{25A1}\u{25BA}\u{25B6}\u{27A2}\u{27A4}\u{2713}\u{2714}\u{2717}\u{2756}\u{25C6}\u{25C7}\u{2023}\u{2043}\u{2219}\u{F0B7}\u{F0A7}\u{F0D8}]";

/// Compiled patterns plus the stopword set.
#[derive(Debug, Clone)]
pub struct TextRules {
    stopwords: HashSet<String>,
    min_keyword_length: usize,
    pub(crate) bullets: Regex,
    pub(crate) horizontal_runs: Regex,
    pub(crate) control_chars: Regex,
    pub(crate) newline_padding: Regex,
    pub(crate) sentence_breaks: Regex,
    pub(crate) non_word: Regex,
    pub(crate) trailing_punctuation: Regex,
    pub(crate) space_before_punctuation: Regex,
    pub(crate) whitespace: Regex,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern is valid")
}

impl TextRules {
    pub fn new(config: &GeneratorConfig) -> Self {
        let mut stopwords: HashSet<String> = STOPWORDS.iter().map(|w| w.to_string()).collect();
        stopwords.extend(
            config
                .extra_stopwords
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );

        Self {
            stopwords,
            min_keyword_length: config.min_keyword_length,
            bullets: compile(BULLET_PATTERN),
            horizontal_runs: compile(r"[^\S\n]{2,}"),
            control_chars: compile(r"[\x00-\x08\x0B-\x1F\x7F]"),
            newline_padding: compile(r"[^\S\n]*\n[^\S\n]*"),
            sentence_breaks: compile(r"[.!?\n]+"),
            non_word: compile(r"[^\p{L}\p{N}\s\-]"),
            trailing_punctuation: compile(r"[.,!?;:]+$"),
            space_before_punctuation: compile(r"\s+([.,!?;:])"),
            whitespace: compile(r"\s+"),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Whether a normalized token is eligible for scoring and blanking.
    pub fn is_content_token(&self, normalized: &str) -> bool {
        !normalized.is_empty()
            && normalized.chars().count() >= self.min_keyword_length
            && !self.is_stopword(normalized)
    }

    /// Strip leading and trailing non-alphanumerics, keeping case.
    pub fn strip_token<'a>(&self, word: &'a str) -> &'a str {
        word.trim_matches(|c: char| !c.is_alphanumeric())
    }

    /// Strip outer punctuation and lowercase.
    pub fn normalize_token(&self, word: &str) -> String {
        self.strip_token(word).to_lowercase()
    }

    /// Trailing sentence punctuation carried by a raw token, if any.
    pub fn trailing_punctuation<'a>(&self, token: &'a str) -> Option<&'a str> {
        self.trailing_punctuation.find(token).map(|m| m.as_str())
    }

    /// Collapse internal whitespace runs to single spaces and trim.
    pub fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }
}

impl Default for TextRules {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default())
    }
}

/// Uppercase the first character of each space-separated part.
pub fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
