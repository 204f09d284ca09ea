//! Stored quizzes with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Quiz, OPTION_COUNT};

/// A generated quiz with an identity, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDocument {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub quiz: Quiz,
}

impl QuizDocument {
    /// Wrap a quiz with a fresh id and the current time.
    pub fn new(quiz: Quiz) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            quiz,
        }
    }

    /// Save the document to a JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize quiz")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write quiz to {}", path.display()))?;
        Ok(())
    }

    /// Load a document from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read quiz from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse quiz JSON")
    }
}

/// Load a quiz from either a saved document or a bare quiz object.
pub fn load_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz from {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).context("failed to parse quiz JSON")?;
    let quiz = if value.get("quiz").is_some() {
        serde_json::from_value::<QuizDocument>(value)
            .context("failed to parse quiz document")?
            .quiz
    } else {
        serde_json::from_value(value).context("failed to parse quiz")?
    };
    check_answer_indices(&quiz)?;
    Ok(quiz)
}

/// Stored answer indices must name one of the options.
fn check_answer_indices(quiz: &Quiz) -> Result<()> {
    for (index, question) in quiz.questions.iter().enumerate() {
        anyhow::ensure!(
            question.answer_index < OPTION_COUNT,
            "question {} has answer index {}, expected 0..={}",
            index + 1,
            question.answer_index,
            OPTION_COUNT - 1
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn sample_quiz() -> Quiz {
        Quiz {
            title: "Cells".into(),
            questions: vec![Question {
                stem: "Fill in the blank: The ____ makes ATP.".into(),
                options: [
                    "Mitochondria".into(),
                    "Ribosome".into(),
                    "Nucleus".into(),
                    "Vacuole".into(),
                ],
                answer_index: 0,
            }],
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quiz.json");
        let doc = QuizDocument::new(sample_quiz());
        doc.save_json(&path).unwrap();

        let loaded = QuizDocument::load_json(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn document_wire_shape() {
        let json = serde_json::to_value(QuizDocument::new(sample_quiz())).unwrap();
        assert!(json["id"].is_string());
        assert!(json["createdAt"].is_string());
        assert_eq!(json["quiz"]["questions"][0]["answerIndex"], 0);
    }

    #[test]
    fn load_quiz_accepts_bare_quiz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.json");
        std::fs::write(&path, serde_json::to_string(&sample_quiz()).unwrap()).unwrap();
        assert_eq!(load_quiz(&path).unwrap(), sample_quiz());

        let doc_path = dir.path().join("doc.json");
        QuizDocument::new(sample_quiz()).save_json(&doc_path).unwrap();
        assert_eq!(load_quiz(&doc_path).unwrap(), sample_quiz());
    }

    #[test]
    fn load_quiz_rejects_out_of_range_answer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.json");
        let mut quiz = sample_quiz();
        quiz.questions[0].answer_index = 4;
        QuizDocument::new(quiz).save_json(&path).unwrap();

        let err = load_quiz(&path).unwrap_err();
        assert!(err
            .to_string()
            .contains("question 1 has answer index 4, expected 0..=3"));
    }

    #[test]
    fn load_invalid_json_fails_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = QuizDocument::load_json(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse quiz JSON"));
    }
}
