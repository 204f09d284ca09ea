//! Trait definition for external quiz generators.
//!
//! The heuristic pipeline needs no provider. A provider is an optional
//! upstream that writes the quiz itself; it is implemented by the
//! `quizgen-providers` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for LLM backends that write quizzes from source text.
#[async_trait]
pub trait QuizProvider: Send + Sync {
    /// Human-readable provider name (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Ask the backend for a quiz.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request for one quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gpt-4o-mini").
    pub model: String,
    /// User prompt carrying the source text.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl GenerateRequest {
    /// Build a request asking for `count` questions about `source`.
    pub fn for_quiz(model: impl Into<String>, source: &str, count: usize) -> Self {
        Self {
            model: model.into(),
            prompt: quiz_prompt(source, count),
            system_prompt: None,
            max_tokens: 4096,
            temperature: 0.2,
        }
    }
}

/// Response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response content.
    pub content: String,
    /// JSON pulled out of markdown fences, or the raw content.
    pub extracted_json: String,
    /// Model that actually generated the response.
    pub model: String,
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

/// Default system prompt for quiz providers.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You write multiple-choice quizzes from study notes. \
Respond ONLY with a JSON object of the form \
{\"title\": string, \"questions\": [{\"question\": string, \"options\": [string, string, string, string], \"correctIndex\": number}]}. \
Every question has exactly four distinct options and correctIndex is between 0 and 3. \
Do not include explanations.";

/// User prompt for `count` questions about `source`.
pub fn quiz_prompt(source: &str, count: usize) -> String {
    format!(
        "Write {count} multiple-choice questions that test the key concepts in these notes.\n\n{source}"
    )
}

/// Extract JSON from markdown-formatted LLM responses.
///
/// Handles:
/// - ```json blocks (the first one wins)
/// - Generic ``` blocks (if no json-specific block is found)
/// - Raw responses with no markdown blocks (returned trimmed)
pub fn extract_json_from_markdown(response: &str) -> String {
    let mut json_block: Option<String> = None;
    let mut generic_block: Option<String> = None;
    let mut in_block = false;
    let mut is_json_block = false;
    let mut is_generic_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();

        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            let lang = trimmed.trim_start_matches('`').trim().to_lowercase();
            is_json_block = lang == "json";
            is_generic_block = lang.is_empty();
            current_block.clear();
            continue;
        }

        if in_block && trimmed == "```" {
            in_block = false;
            if is_json_block && json_block.is_none() {
                json_block = Some(current_block.clone());
            } else if is_generic_block && generic_block.is_none() {
                generic_block = Some(current_block.clone());
            }
            current_block.clear();
            continue;
        }

        if in_block {
            if !current_block.is_empty() {
                current_block.push('\n');
            }
            current_block.push_str(line);
        }
    }

    // Truncated (unclosed) block: keep what arrived.
    if in_block && !current_block.is_empty() {
        if is_json_block && json_block.is_none() {
            json_block = Some(current_block);
        } else if is_generic_block && generic_block.is_none() {
            generic_block = Some(current_block);
        }
    }

    json_block
        .or(generic_block)
        .unwrap_or_else(|| response.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_block() {
        let input = "Here is your quiz:\n\n```json\n{\"title\": \"Cells\"}\n```\n\nGood luck!";
        assert_eq!(extract_json_from_markdown(input), "{\"title\": \"Cells\"}");
    }

    #[test]
    fn extract_generic_block_fallback() {
        let input = "```\n{\"title\": \"Generic\"}\n```";
        assert_eq!(extract_json_from_markdown(input), "{\"title\": \"Generic\"}");
    }

    #[test]
    fn extract_prefers_json_over_generic() {
        let input = "```\nnot it\n```\n\n```json\n{\"a\": 1}\n```\n";
        assert_eq!(extract_json_from_markdown(input), "{\"a\": 1}");
    }

    #[test]
    fn extract_no_blocks_returns_trimmed_raw() {
        let input = "  {\"title\": \"Raw\"}\n";
        assert_eq!(extract_json_from_markdown(input), "{\"title\": \"Raw\"}");
    }

    #[test]
    fn extract_truncated_unclosed_block() {
        let input = "```json\n{\"title\": \"Cut";
        assert_eq!(extract_json_from_markdown(input), "{\"title\": \"Cut");
    }

    #[test]
    fn extract_ignores_other_languages() {
        let input = "```python\nprint(1)\n```\nplain tail";
        assert_eq!(extract_json_from_markdown(input), input.trim());
    }

    #[test]
    fn quiz_request_carries_count_and_source() {
        let request = GenerateRequest::for_quiz("gpt-4o-mini", "Mitochondria make ATP.", 5);
        assert_eq!(request.model, "gpt-4o-mini");
        assert!(request.prompt.starts_with("Write 5 multiple-choice questions"));
        assert!(request.prompt.ends_with("Mitochondria make ATP."));
        assert!(request.system_prompt.is_none());
    }
}
