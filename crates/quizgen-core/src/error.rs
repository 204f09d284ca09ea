//! Error types shared across quizgen crates.
//!
//! Generation and grading themselves never fail: they degrade by producing
//! fewer questions. These types cover the edges around them: external
//! generator failures, quizzes that arrive in the wrong shape, and bad
//! configuration.

use thiserror::Error;

/// Errors that can occur when interacting with an external quiz provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// A quiz produced outside the heuristic engine did not have the expected shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// No JSON object could be located in the response.
    #[error("no JSON object found in response")]
    NoJson,

    /// The JSON did not deserialize into the quiz shape.
    #[error("malformed quiz JSON: {0}")]
    Malformed(String),

    #[error("quiz title is missing or empty")]
    MissingTitle,

    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {index}: stem is empty")]
    EmptyStem { index: usize },

    #[error("question {index}: expected 4 options, found {found}")]
    OptionCount { index: usize, found: usize },

    #[error("question {index}: options are not distinct")]
    DuplicateOptions { index: usize },

    #[error("question {index}: correct index {value} is out of range")]
    IndexOutOfRange { index: usize, value: i64 },
}

/// Invalid generator settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("desired_count must be at least 1")]
    ZeroDesiredCount,

    #[error("max_phrase_tokens must be between 1 and 3, got {0}")]
    PhraseTokens(usize),

    #[error("min_keyword_length must be at least 1")]
    ZeroKeywordLength,

    #[error("blank_marker must not be empty")]
    EmptyBlankMarker,

    #[error("title must not be empty")]
    EmptyTitle,
}
