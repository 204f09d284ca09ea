//! Generation front door.
//!
//! Tries the configured external provider first, with retries, and falls
//! back to the heuristic assembler when it is missing, keeps failing, or
//! answers with something that is not a usable quiz.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::assembler::QuizAssembler;
use crate::config::GeneratorConfig;
use crate::error::ProviderError;
use crate::model::Quiz;
use crate::rules::TextRules;
use crate::traits::{GenerateRequest, GenerateResponse, QuizProvider};
use crate::validate::parse_quiz_json;

/// Longest pause between provider retries.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Configuration for the quiz engine.
#[derive(Debug, Clone)]
pub struct QuizEngineConfig {
    /// Retries on provider errors (not on malformed quizzes).
    pub max_retries: u32,
    /// Delay before the first retry; doubles after each attempt.
    pub retry_delay: Duration,
    /// Max tokens for generation.
    pub max_tokens: u32,
    /// Temperature for generation.
    pub temperature: f64,
    /// Optional system prompt override.
    pub system_prompt_override: Option<String>,
    /// Seed for the heuristic generator's shuffles.
    pub seed: Option<u64>,
}

impl Default for QuizEngineConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            max_tokens: 4096,
            temperature: 0.2,
            system_prompt_override: None,
            seed: None,
        }
    }
}

/// Where a quiz came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QuizOrigin {
    Heuristic,
    External { provider: String, model: String },
}

/// A quiz plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub quiz: Quiz,
    pub origin: QuizOrigin,
}

/// The central generation engine.
pub struct QuizEngine {
    provider: Option<(Arc<dyn QuizProvider>, String)>,
    generator: GeneratorConfig,
    rules: TextRules,
    config: QuizEngineConfig,
}

impl QuizEngine {
    /// An engine that only uses the heuristic assembler.
    pub fn new(generator: GeneratorConfig, config: QuizEngineConfig) -> Self {
        let rules = TextRules::new(&generator);
        Self {
            provider: None,
            generator,
            rules,
            config,
        }
    }

    /// Try `provider` with `model` before falling back.
    pub fn with_provider(mut self, provider: Arc<dyn QuizProvider>, model: impl Into<String>) -> Self {
        self.provider = Some((provider, model.into()));
        self
    }

    pub fn generator(&self) -> &GeneratorConfig {
        &self.generator
    }

    /// Generate up to `desired_count` questions from `text`.
    pub async fn generate(&self, text: &str, desired_count: usize) -> GenerationOutcome {
        if let Some((provider, model)) = &self.provider {
            if desired_count > 0 {
                match self.request_external(provider.as_ref(), model, text, desired_count).await {
                    Ok(quiz) => {
                        return GenerationOutcome {
                            quiz,
                            origin: QuizOrigin::External {
                                provider: provider.name().to_string(),
                                model: model.clone(),
                            },
                        };
                    }
                    Err(e) => {
                        tracing::warn!(
                            provider = provider.name(),
                            %model,
                            "external generation failed, using heuristic generator: {e:#}"
                        );
                    }
                }
            }
        }

        GenerationOutcome {
            quiz: self.heuristic(text, desired_count),
            origin: QuizOrigin::Heuristic,
        }
    }

    fn heuristic(&self, text: &str, desired_count: usize) -> Quiz {
        let assembler = QuizAssembler::new(&self.rules, &self.generator);
        match self.config.seed {
            Some(seed) => assembler.assemble(text, desired_count, &mut StdRng::seed_from_u64(seed)),
            None => assembler.assemble(text, desired_count, &mut rand::rng()),
        }
    }

    async fn request_external(
        &self,
        provider: &dyn QuizProvider,
        model: &str,
        text: &str,
        desired_count: usize,
    ) -> Result<Quiz> {
        let mut request = GenerateRequest::for_quiz(model, text, desired_count);
        request.system_prompt = self.config.system_prompt_override.clone();
        request.max_tokens = self.config.max_tokens;
        request.temperature = self.config.temperature;

        let response = self.generate_with_retries(provider, &request).await?;
        let mut quiz = parse_quiz_json(&response.extracted_json)?;
        quiz.questions.truncate(desired_count);

        tracing::info!(
            provider = provider.name(),
            model = %response.model,
            questions = quiz.questions.len(),
            total_tokens = response.token_usage.total_tokens,
            latency_ms = response.latency_ms,
            "external quiz accepted"
        );
        Ok(quiz)
    }

    /// Retry on transient provider errors with exponential backoff.
    async fn generate_with_retries(
        &self,
        provider: &dyn QuizProvider,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse> {
        let mut last_error = None;
        let mut retry_delay = self.config.retry_delay;
        for retry in 0..=self.config.max_retries {
            if retry > 0 {
                tokio::time::sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
            }
            match provider.generate(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if let Some(provider_error) = e.downcast_ref::<ProviderError>() {
                        if provider_error.is_permanent() {
                            return Err(e);
                        }
                        if let Some(ms) = provider_error.retry_after_ms() {
                            retry_delay = Duration::from_millis(ms).min(MAX_RETRY_DELAY);
                        }
                    }
                    tracing::debug!(attempt = retry + 1, "provider request failed: {e:#}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
    }
}
