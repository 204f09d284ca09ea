//! Turns a phrase candidate into a fill-in-the-blank question.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::model::Question;
use crate::phrases::PhraseCandidate;
use crate::rules::{title_case, TextRules};
use crate::segment::Sentence;

/// Distractors needed alongside the correct answer.
pub const DISTRACTOR_COUNT: usize = 3;

/// Why a candidate produced no question.
///
/// None of these is fatal: the assembler moves on to the next candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("span {start}..{end} does not fit a sentence of {tokens} tokens")]
    StaleSpan {
        start: usize,
        end: usize,
        tokens: usize,
    },

    #[error("sentence already contains the blank marker")]
    BlankInSource,

    #[error("correct answer is shorter than two characters")]
    AnswerTooShort,

    #[error("only {found} distinct distractors available")]
    InsufficientDistractors { found: usize },

    #[error("correct answer not found among shuffled options")]
    AnswerLost,
}

/// Render a phrase as an answer option: whitespace collapsed, title case.
pub fn prettify_option(rules: &TextRules, value: &str) -> String {
    title_case(&rules.collapse_whitespace(value))
}

/// Builds questions from candidates using shared rules and settings.
#[derive(Debug, Clone, Copy)]
pub struct QuestionBuilder<'a> {
    rules: &'a TextRules,
    config: &'a GeneratorConfig,
}

impl<'a> QuestionBuilder<'a> {
    pub fn new(rules: &'a TextRules, config: &'a GeneratorConfig) -> Self {
        Self { rules, config }
    }

    /// Build a question for `candidate` inside `sentence`.
    ///
    /// Distractors come first from the other candidates (in their given
    /// order), then from `keywords`. Options are shuffled with `rng`.
    pub fn build<R>(
        &self,
        sentence: &Sentence,
        candidate: &PhraseCandidate,
        candidates: &[PhraseCandidate],
        keywords: &[String],
        rng: &mut R,
    ) -> Result<Question, Rejection>
    where
        R: Rng + ?Sized,
    {
        let stem = self.stem(sentence, candidate)?;

        let correct = prettify_option(self.rules, &candidate.surface);
        if correct.chars().count() < 2 {
            return Err(Rejection::AnswerTooShort);
        }

        let distractors = self.distractors(&correct, candidate, candidates, keywords);
        let [first, second, third] = <[String; DISTRACTOR_COUNT]>::try_from(distractors)
            .map_err(|found| Rejection::InsufficientDistractors { found: found.len() })?;

        let mut options = [correct, first, second, third];
        let correct_key = options[0].to_lowercase();
        options.shuffle(rng);

        let answer_index = options
            .iter()
            .position(|option| option.to_lowercase() == correct_key)
            .ok_or(Rejection::AnswerLost)?;

        Ok(Question {
            stem,
            options,
            answer_index,
        })
    }

    /// Replace the candidate's span with a single blank marker.
    ///
    /// Trailing punctuation on the span's last token stays after the blank.
    pub fn stem(
        &self,
        sentence: &Sentence,
        candidate: &PhraseCandidate,
    ) -> Result<String, Rejection> {
        let tokens = sentence.tokens();
        let end = candidate.end();
        if candidate.len == 0 || end > tokens.len() {
            return Err(Rejection::StaleSpan {
                start: candidate.start,
                end,
                tokens: tokens.len(),
            });
        }

        let marker = self.config.blank_marker.as_str();
        if sentence.text.contains(marker) {
            return Err(Rejection::BlankInSource);
        }

        let mut parts: Vec<String> = Vec::with_capacity(tokens.len());
        for (idx, token) in tokens.iter().enumerate() {
            if idx == candidate.start {
                let trailing = self.rules.trailing_punctuation(tokens[end - 1]).unwrap_or("");
                parts.push(format!("{marker}{trailing}"));
            } else if idx > candidate.start && idx < end {
                continue;
            } else {
                parts.push((*token).to_string());
            }
        }

        let joined = parts.join(" ");
        let tightened = self
            .rules
            .space_before_punctuation
            .replace_all(&joined, "$1");
        let stem = self.rules.collapse_whitespace(&tightened);

        if stem.contains(marker) {
            Ok(format!("{} {stem}", self.config.lead_in.trim()))
        } else {
            Ok(stem)
        }
    }

    fn distractors(
        &self,
        correct: &str,
        candidate: &PhraseCandidate,
        candidates: &[PhraseCandidate],
        keywords: &[String],
    ) -> Vec<String> {
        let correct_key = correct.to_lowercase();
        let mut chosen: Vec<String> = Vec::with_capacity(DISTRACTOR_COUNT);

        for other in candidates {
            if chosen.len() >= DISTRACTOR_COUNT {
                break;
            }
            if other.normalized == candidate.normalized {
                continue;
            }
            offer(&mut chosen, &correct_key, prettify_option(self.rules, &other.surface));
        }

        for word in keywords {
            if chosen.len() >= DISTRACTOR_COUNT {
                break;
            }
            offer(&mut chosen, &correct_key, title_case(word));
        }

        chosen
    }
}

/// Add `option` unless it is empty or repeats the answer or an earlier pick.
fn offer(chosen: &mut Vec<String>, correct_key: &str, option: String) {
    if option.is_empty() {
        return;
    }
    let key = option.to_lowercase();
    if key == correct_key || chosen.iter().any(|c| c.to_lowercase() == key) {
        return;
    }
    chosen.push(option);
}
