//! Generator settings.
//!
//! Loaded from the `[generator]` table of `quizgen.toml`; every field has a
//! default so an empty table (or no table at all) gives the stock behavior.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of questions per quiz.
pub const DEFAULT_DESIRED_COUNT: usize = 10;

/// Fragments shorter than this many characters are not sentences.
pub const MIN_SENTENCE_LENGTH: usize = 35;

/// Title used when no external generator supplies one.
pub const DEFAULT_TITLE: &str = "Auto-generated Quiz";

/// Marker substituted for the tested phrase in a stem.
pub const BLANK_MARKER: &str = "____";

/// Tunables for the heuristic generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Target question count.
    #[serde(default = "default_desired_count")]
    pub desired_count: usize,
    /// Minimum sentence length in characters.
    #[serde(default = "default_min_sentence_length")]
    pub min_sentence_length: usize,
    /// Longest phrase, in tokens, considered for blanking.
    #[serde(default = "default_max_phrase_tokens")]
    pub max_phrase_tokens: usize,
    /// Shortest normalized token that counts as content.
    #[serde(default = "default_min_keyword_length")]
    pub min_keyword_length: usize,
    /// Quiz title.
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_blank_marker")]
    pub blank_marker: String,
    /// Text prepended to a stem when it contains the blank marker.
    #[serde(default = "default_lead_in")]
    pub lead_in: String,
    /// Additional stopwords on top of the built-in English set.
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
}

fn default_desired_count() -> usize {
    DEFAULT_DESIRED_COUNT
}
fn default_min_sentence_length() -> usize {
    MIN_SENTENCE_LENGTH
}
fn default_max_phrase_tokens() -> usize {
    3
}
fn default_min_keyword_length() -> usize {
    4
}
fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}
fn default_blank_marker() -> String {
    BLANK_MARKER.to_string()
}
fn default_lead_in() -> String {
    "Fill in the blank:".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            desired_count: default_desired_count(),
            min_sentence_length: default_min_sentence_length(),
            max_phrase_tokens: default_max_phrase_tokens(),
            min_keyword_length: default_min_keyword_length(),
            title: default_title(),
            blank_marker: default_blank_marker(),
            lead_in: default_lead_in(),
            extra_stopwords: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Check the settings for values the generator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.desired_count == 0 {
            return Err(ConfigError::ZeroDesiredCount);
        }
        if !(1..=3).contains(&self.max_phrase_tokens) {
            return Err(ConfigError::PhraseTokens(self.max_phrase_tokens));
        }
        if self.min_keyword_length == 0 {
            return Err(ConfigError::ZeroKeywordLength);
        }
        if self.blank_marker.trim().is_empty() {
            return Err(ConfigError::EmptyBlankMarker);
        }
        if self.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        Ok(())
    }
}
