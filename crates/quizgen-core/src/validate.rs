//! Shape checks for quizzes that did not come from the heuristic engine.
//!
//! External generators answer with loosely formatted JSON. `parse_external_quiz`
//! accepts the first JSON object it can find and rejects anything that would
//! break grading; `validate_quiz` flags softer problems in stored quizzes.

use std::collections::HashSet;

use serde::Deserialize;

use crate::config::BLANK_MARKER;
use crate::error::ShapeError;
use crate::model::{Question, Quiz, OPTION_COUNT};
use crate::traits::extract_json_from_markdown;

/// Intermediate structure for the loose external shape.
#[derive(Debug, Deserialize)]
struct LooseQuiz {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    questions: Vec<LooseQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LooseQuestion {
    #[serde(default)]
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default, alias = "answerIndex")]
    correct_index: Option<i64>,
}

/// Parse and check a raw response from an external generator.
pub fn parse_external_quiz(content: &str) -> Result<Quiz, ShapeError> {
    parse_quiz_json(&extract_json_from_markdown(content))
}

/// Parse and check JSON already pulled out of a response's markdown
/// fences. Prose around a single object is tolerated.
pub fn parse_quiz_json(json: &str) -> Result<Quiz, ShapeError> {
    let json = object_span(json).ok_or(ShapeError::NoJson)?;
    let loose: LooseQuiz =
        serde_json::from_str(json).map_err(|e| ShapeError::Malformed(e.to_string()))?;

    let title = loose
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ShapeError::MissingTitle)?;

    if loose.questions.is_empty() {
        return Err(ShapeError::NoQuestions);
    }

    let questions = loose
        .questions
        .into_iter()
        .enumerate()
        .map(|(index, q)| check_question(index, q))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Quiz { title, questions })
}

fn check_question(index: usize, loose: LooseQuestion) -> Result<Question, ShapeError> {
    let stem = loose.question.trim().to_string();
    if stem.is_empty() {
        return Err(ShapeError::EmptyStem { index });
    }

    let found = loose.options.len();
    let options: [String; OPTION_COUNT] = loose
        .options
        .into_iter()
        .map(|o| o.trim().to_string())
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|_| ShapeError::OptionCount { index, found })?;

    let distinct: HashSet<String> = options.iter().map(|o| o.to_lowercase()).collect();
    if distinct.len() != OPTION_COUNT {
        return Err(ShapeError::DuplicateOptions { index });
    }

    let value = loose.correct_index.unwrap_or(-1);
    let answer_index = usize::try_from(value)
        .ok()
        .filter(|&i| i < OPTION_COUNT)
        .ok_or(ShapeError::IndexOutOfRange { index, value })?;

    Ok(Question {
        stem,
        options,
        answer_index,
    })
}

/// The outermost `{ ... }` span of `text`.
fn object_span(text: &str) -> Option<&str> {
    let text = text.trim();
    if text.starts_with('{') {
        return Some(text);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// A soft issue found in a stored quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Question index, when the warning is about a single question.
    pub question: Option<usize>,
    pub message: String,
}

impl ValidationWarning {
    fn question(index: usize, message: impl Into<String>) -> Self {
        Self {
            question: Some(index),
            message: message.into(),
        }
    }
}

/// Validate a quiz for common issues.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if quiz.title.trim().is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "title is empty".into(),
        });
    }
    if quiz.questions.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "quiz has no questions".into(),
        });
    }

    let mut seen_stems = HashSet::new();
    for (index, question) in quiz.questions.iter().enumerate() {
        if !seen_stems.insert(question.stem.trim().to_lowercase()) {
            warnings.push(ValidationWarning::question(index, "duplicate question stem"));
        }
        if !question.stem.contains(BLANK_MARKER) {
            warnings.push(ValidationWarning::question(index, "stem has no blank marker"));
        }
        if question.options.iter().any(|o| o.trim().is_empty()) {
            warnings.push(ValidationWarning::question(index, "empty option"));
        }
        let distinct: HashSet<String> =
            question.options.iter().map(|o| o.to_lowercase()).collect();
        if distinct.len() != OPTION_COUNT {
            warnings.push(ValidationWarning::question(index, "options are not distinct"));
        }
        if question.answer_index >= OPTION_COUNT {
            warnings.push(ValidationWarning::question(
                index,
                format!("answer index {} is out of range", question.answer_index),
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "title": "Cell Biology",
        "questions": [
            {
                "question": "Which organelle makes ATP?",
                "options": ["Mitochondria", "Ribosome", "Nucleus", "Vacuole"],
                "correctIndex": 0
            }
        ]
    }"#;

    #[test]
    fn parse_bare_json() {
        let quiz = parse_external_quiz(VALID).unwrap();
        assert_eq!(quiz.title, "Cell Biology");
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].correct_answer(), "Mitochondria");
    }

    #[test]
    fn parse_fenced_json_with_chatter() {
        let content = format!("Sure! Here is the quiz:\n\n```json\n{VALID}\n```\nEnjoy.");
        assert_eq!(parse_external_quiz(&content).unwrap().title, "Cell Biology");
    }

    #[test]
    fn parse_object_embedded_in_prose() {
        let content = format!("The quiz follows. {VALID} That is all.");
        assert!(parse_external_quiz(&content).is_ok());
    }

    #[test]
    fn parse_pre_extracted_json() {
        assert_eq!(parse_quiz_json(VALID).unwrap().questions.len(), 1);
        let padded = format!("quiz: {VALID} (end)");
        assert_eq!(parse_quiz_json(&padded).unwrap().title, "Cell Biology");
        assert!(matches!(parse_quiz_json("no braces"), Err(ShapeError::NoJson)));
    }

    #[test]
    fn accepts_answer_index_alias() {
        let content = r#"{"title": "T", "questions": [{"question": "q", "options": ["a","b","c","d"], "answerIndex": 3}]}"#;
        assert_eq!(parse_external_quiz(content).unwrap().questions[0].answer_index, 3);
    }

    #[test]
    fn no_json_at_all() {
        assert_eq!(
            parse_external_quiz("I cannot help with that."),
            Err(ShapeError::NoJson)
        );
    }

    #[test]
    fn malformed_json() {
        let err = parse_external_quiz("{\"title\": \"T\", \"questions\": [}").unwrap_err();
        assert!(matches!(err, ShapeError::Malformed(_)));
    }

    #[test]
    fn missing_title_and_questions() {
        assert_eq!(
            parse_external_quiz(r#"{"questions": []}"#),
            Err(ShapeError::MissingTitle)
        );
        assert_eq!(
            parse_external_quiz(r#"{"title": "T", "questions": []}"#),
            Err(ShapeError::NoQuestions)
        );
    }

    #[test]
    fn question_level_failures_name_the_question() {
        let three = r#"{"title": "T", "questions": [{"question": "q", "options": ["a","b","c"], "correctIndex": 0}]}"#;
        assert_eq!(
            parse_external_quiz(three),
            Err(ShapeError::OptionCount { index: 0, found: 3 })
        );

        let dupes = r#"{"title": "T", "questions": [{"question": "q", "options": ["a","A","c","d"], "correctIndex": 0}]}"#;
        assert_eq!(
            parse_external_quiz(dupes),
            Err(ShapeError::DuplicateOptions { index: 0 })
        );

        let range = r#"{"title": "T", "questions": [{"question": "q", "options": ["a","b","c","d"], "correctIndex": 4}]}"#;
        assert_eq!(
            parse_external_quiz(range),
            Err(ShapeError::IndexOutOfRange { index: 0, value: 4 })
        );

        let stem = r#"{"title": "T", "questions": [{"question": "  ", "options": ["a","b","c","d"], "correctIndex": 1}]}"#;
        assert_eq!(
            parse_external_quiz(stem),
            Err(ShapeError::EmptyStem { index: 0 })
        );
    }

    #[test]
    fn missing_index_is_out_of_range() {
        let content = r#"{"title": "T", "questions": [{"question": "q", "options": ["a","b","c","d"]}]}"#;
        assert_eq!(
            parse_external_quiz(content),
            Err(ShapeError::IndexOutOfRange { index: 0, value: -1 })
        );
    }

    #[test]
    fn validate_clean_quiz() {
        let quiz = Quiz {
            title: "T".into(),
            questions: vec![Question {
                stem: "Fill in the blank: ____ makes ATP.".into(),
                options: ["A".into(), "B".into(), "C".into(), "D".into()],
                answer_index: 0,
            }],
        };
        assert!(validate_quiz(&quiz).is_empty());
    }

    #[test]
    fn validate_flags_soft_issues() {
        let question = Question {
            stem: "Which organelle makes ATP?".into(),
            options: ["A".into(), "".into(), "C".into(), "D".into()],
            answer_index: 0,
        };
        let quiz = Quiz {
            title: "T".into(),
            questions: vec![question.clone(), question],
        };
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("blank marker")));
        assert!(warnings.iter().any(|w| w.message == "empty option"));
        assert!(warnings.iter().all(|w| w.question.is_some()));
    }

    #[test]
    fn validate_empty_quiz() {
        let warnings = validate_quiz(&Quiz::empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "quiz has no questions");
    }
}
