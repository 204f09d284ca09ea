//! Core data model types for quizgen.
//!
//! Field names on the wire follow the shapes the upload and submit layers
//! exchange: `question`, `options`, `answerIndex`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TITLE;

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stem with the tested phrase replaced by the blank marker.
    #[serde(rename = "question")]
    pub stem: String,
    /// Exactly four options, distinct ignoring case.
    pub options: [String; OPTION_COUNT],
    /// Position of the correct option, 0..=3.
    pub answer_index: usize,
}

impl Question {
    /// The text of the correct option, empty when `answer_index` is out
    /// of range.
    pub fn correct_answer(&self) -> &str {
        self.options
            .get(self.answer_index)
            .map_or("", String::as_str)
    }
}

/// A generated quiz. Zero questions means generation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    /// A quiz with the default title and no questions.
    pub fn empty() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            questions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// A learner's answers: question index to chosen option index.
///
/// Missing entries are unanswered. Values are kept as submitted, so an
/// out-of-range or negative index survives until grading marks it wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSubmission {
    answers: BTreeMap<usize, i64>,
}

impl AnswerSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing any previous one for the question.
    pub fn answer(&mut self, question: usize, option: i64) -> &mut Self {
        self.answers.insert(question, option);
        self
    }

    pub fn get(&self, question: usize) -> Option<i64> {
        self.answers.get(&question).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl FromIterator<(usize, i64)> for AnswerSubmission {
    fn from_iter<I: IntoIterator<Item = (usize, i64)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

/// Accepts both a bare `{ "0": 2 }` map and the `{ "answers": { ... } }`
/// submit payload.
impl<'de> Deserialize<'de> for AnswerSubmission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(SubmissionVisitor)
    }
}

struct SubmissionVisitor;

impl<'de> serde::de::Visitor<'de> for SubmissionVisitor {
    type Value = AnswerSubmission;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from question index to option index")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut answers = BTreeMap::new();
        while let Some(key) = map.next_key::<String>()? {
            if key == "answers" {
                let nested: BTreeMap<usize, i64> = map.next_value()?;
                answers.extend(nested);
                continue;
            }
            let index = key.trim().parse::<usize>().map_err(|_| {
                <A::Error as serde::de::Error>::custom(format!("invalid question index: {key}"))
            })?;
            answers.insert(index, map.next_value()?);
        }
        Ok(AnswerSubmission { answers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            stem: "Fill in the blank: ____ converts light into chemical energy.".into(),
            options: [
                "Chlorophyll".into(),
                "Photosynthesis".into(),
                "Glucose".into(),
                "Stomata".into(),
            ],
            answer_index: 1,
        }
    }

    #[test]
    fn question_wire_shape() {
        let json = serde_json::to_value(sample_question()).unwrap();
        assert_eq!(json["answerIndex"], 1);
        assert!(json["question"].as_str().unwrap().contains("____"));
        assert_eq!(json["options"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn wrong_option_count_does_not_deserialize() {
        let json = r#"{"question": "q ____", "options": ["a", "b", "c"], "answerIndex": 0}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }

    #[test]
    fn correct_answer_text() {
        assert_eq!(sample_question().correct_answer(), "Photosynthesis");
    }

    #[test]
    fn out_of_range_answer_has_no_text() {
        let question = Question {
            answer_index: 7,
            ..sample_question()
        };
        assert_eq!(question.correct_answer(), "");
    }

    #[test]
    fn empty_quiz_has_default_title() {
        let quiz = Quiz::empty();
        assert_eq!(quiz.title, "Auto-generated Quiz");
        assert!(quiz.is_empty());
    }

    #[test]
    fn submission_from_bare_map() {
        let submission: AnswerSubmission =
            serde_json::from_str(r#"{"0": 2, "3": -1, "7": 9}"#).unwrap();
        assert_eq!(submission.get(0), Some(2));
        assert_eq!(submission.get(3), Some(-1));
        assert_eq!(submission.get(1), None);
        assert_eq!(submission.len(), 3);
    }

    #[test]
    fn submission_from_wrapped_payload() {
        let submission: AnswerSubmission =
            serde_json::from_str(r#"{"answers": {"1": 0}}"#).unwrap();
        assert_eq!(submission.get(1), Some(0));
    }

    #[test]
    fn submission_rejects_non_numeric_keys() {
        assert!(serde_json::from_str::<AnswerSubmission>(r#"{"first": 1}"#).is_err());
    }

    #[test]
    fn submission_builder() {
        let mut submission = AnswerSubmission::new();
        submission.answer(0, 1).answer(0, 3);
        assert_eq!(submission.get(0), Some(3));
        let collected: AnswerSubmission = vec![(2, 1)].into_iter().collect();
        assert_eq!(collected.get(2), Some(1));
    }
}
