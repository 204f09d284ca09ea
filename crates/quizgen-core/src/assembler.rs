//! Quiz assembly: runs the text pipeline and picks candidates until the
//! target question count is reached.
//!
//! Selection happens in up to three passes:
//!
//! 1. Candidates by descending score, at most one question per sentence.
//! 2. Candidates again, several per sentence allowed, skipping phrases
//!    already asked about.
//! 3. Keywords by frequency, each blanked as a single token at its first
//!    standalone occurrence.
//!
//! Running short is not an error; the caller decides what an empty quiz means.

use std::collections::HashSet;
use std::sync::LazyLock;

use rand::Rng;
use tracing::{debug, info};

use crate::builder::QuestionBuilder;
use crate::config::GeneratorConfig;
use crate::frequency::FrequencyModel;
use crate::model::{Question, Quiz};
use crate::normalize::normalize_text;
use crate::phrases::{extract_phrases, PhraseCandidate};
use crate::rules::TextRules;
use crate::segment::{split_sentences, Sentence};

static DEFAULT_CONFIG: LazyLock<GeneratorConfig> = LazyLock::new(GeneratorConfig::default);
static DEFAULT_RULES: LazyLock<TextRules> = LazyLock::new(|| TextRules::new(&DEFAULT_CONFIG));

/// Generate a quiz with the stock settings and the thread-local RNG.
pub fn generate_quiz(text: &str, desired_count: usize) -> Quiz {
    generate_quiz_with_rng(text, desired_count, &mut rand::rng())
}

/// Generate a quiz with the stock settings and a caller-supplied RNG.
pub fn generate_quiz_with_rng<R>(text: &str, desired_count: usize, rng: &mut R) -> Quiz
where
    R: Rng + ?Sized,
{
    QuizAssembler::new(&DEFAULT_RULES, &DEFAULT_CONFIG).assemble(text, desired_count, rng)
}

/// Everything derived from one source text before questions are built.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub sentences: Vec<Sentence>,
    pub frequency: FrequencyModel,
    pub candidates: Vec<PhraseCandidate>,
}

/// Orchestrates the pipeline for one generation call.
#[derive(Debug, Clone, Copy)]
pub struct QuizAssembler<'a> {
    rules: &'a TextRules,
    config: &'a GeneratorConfig,
}

impl<'a> QuizAssembler<'a> {
    pub fn new(rules: &'a TextRules, config: &'a GeneratorConfig) -> Self {
        Self { rules, config }
    }

    /// Normalize, segment, count and extract candidates.
    pub fn analyze(&self, text: &str) -> Analysis {
        let text = normalize_text(self.rules, text);
        let sentences = split_sentences(self.rules, &text, self.config.min_sentence_length);
        let frequency = FrequencyModel::build(self.rules, &text);
        let candidates = extract_phrases(
            self.rules,
            &sentences,
            &frequency,
            self.config.max_phrase_tokens,
        );
        Analysis {
            sentences,
            frequency,
            candidates,
        }
    }

    /// Build up to `desired_count` questions from `text`.
    pub fn assemble<R>(&self, text: &str, desired_count: usize, rng: &mut R) -> Quiz
    where
        R: Rng + ?Sized,
    {
        let mut quiz = Quiz {
            title: self.config.title.clone(),
            questions: Vec::new(),
        };
        if desired_count == 0 {
            return quiz;
        }

        let analysis = self.analyze(text);
        let builder = QuestionBuilder::new(self.rules, self.config);
        let candidates = &analysis.candidates;
        let keywords = analysis.frequency.keywords();
        let mut questions: Vec<Question> = Vec::new();
        let mut used_sentences: HashSet<usize> = HashSet::new();
        let mut used_phrases: HashSet<&str> = HashSet::new();

        debug!(
            sentences = analysis.sentences.len(),
            candidates = candidates.len(),
            keywords = keywords.len(),
            "analyzed source text"
        );

        // Pass 1: one question per sentence.
        for candidate in candidates {
            if questions.len() >= desired_count {
                break;
            }
            if used_sentences.contains(&candidate.sentence_index) {
                continue;
            }
            if let Some(question) =
                self.try_build(&builder, &analysis, candidate, keywords, rng)
            {
                questions.push(question);
                used_sentences.insert(candidate.sentence_index);
                used_phrases.insert(&candidate.normalized);
            }
        }
        debug!(count = questions.len(), "pass 1 complete");

        // Pass 2: any sentence, unused phrases only.
        if questions.len() < desired_count {
            for candidate in candidates {
                if questions.len() >= desired_count {
                    break;
                }
                if used_phrases.contains(candidate.normalized.as_str()) {
                    continue;
                }
                if let Some(question) =
                    self.try_build(&builder, &analysis, candidate, keywords, rng)
                {
                    questions.push(question);
                    used_phrases.insert(&candidate.normalized);
                }
            }
            debug!(count = questions.len(), "pass 2 complete");
        }

        // Pass 3: single keywords at their first standalone occurrence,
        // skipping keywords already asked as a phrase.
        if questions.len() < desired_count {
            for keyword in keywords {
                if questions.len() >= desired_count {
                    break;
                }
                if used_phrases.contains(keyword.as_str()) {
                    continue;
                }
                if let Some(question) =
                    self.keyword_question(&builder, &analysis, keyword, rng)
                {
                    questions.push(question);
                    used_phrases.insert(keyword);
                }
            }
            debug!(count = questions.len(), "pass 3 complete");
        }

        if questions.len() < desired_count {
            info!(
                produced = questions.len(),
                desired = desired_count,
                "source text too sparse for the requested question count"
            );
        }

        quiz.questions = questions;
        quiz
    }

    fn try_build<R>(
        &self,
        builder: &QuestionBuilder<'_>,
        analysis: &Analysis,
        candidate: &PhraseCandidate,
        keywords: &[String],
        rng: &mut R,
    ) -> Option<Question>
    where
        R: Rng + ?Sized,
    {
        let Some(sentence) = analysis.sentences.get(candidate.sentence_index) else {
            debug!(
                sentence = candidate.sentence_index,
                "candidate refers to a missing sentence"
            );
            return None;
        };
        match builder.build(sentence, candidate, &analysis.candidates, keywords, rng) {
            Ok(question) => Some(question),
            Err(reason) => {
                debug!(phrase = %candidate.normalized, %reason, "candidate rejected");
                None
            }
        }
    }

    fn keyword_question<R>(
        &self,
        builder: &QuestionBuilder<'_>,
        analysis: &Analysis,
        keyword: &str,
        rng: &mut R,
    ) -> Option<Question>
    where
        R: Rng + ?Sized,
    {
        for sentence in &analysis.sentences {
            if !sentence.text.to_lowercase().contains(keyword) {
                continue;
            }
            let tokens = sentence.tokens();
            let Some(start) = tokens
                .iter()
                .position(|token| self.rules.normalize_token(token) == keyword)
            else {
                continue;
            };

            let candidate = PhraseCandidate {
                sentence_index: sentence.index,
                start,
                len: 1,
                surface: self.rules.strip_token(tokens[start]).to_string(),
                normalized: keyword.to_string(),
                score: 1,
            };
            if let Some(question) =
                self.try_build(builder, analysis, &candidate, analysis.frequency.keywords(), rng)
            {
                return Some(question);
            }
        }
        None
    }
}
