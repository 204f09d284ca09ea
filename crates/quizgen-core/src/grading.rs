//! Grading of learner submissions.
//!
//! Grading is total: missing, extra, negative or out-of-range answers never
//! fail, they simply do not match the stored answer index.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerSubmission, Quiz, OPTION_COUNT};

/// Sentinel for an unanswered question in [`QuestionDetail::user_index`].
pub const UNANSWERED: i64 = -1;

/// Per-question breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    pub question: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: usize,
    pub correct_answer: String,
    /// Chosen option, or [`UNANSWERED`].
    pub user_index: i64,
}

impl QuestionDetail {
    pub fn is_answered(&self) -> bool {
        self.user_index != UNANSWERED
    }

    pub fn is_correct(&self) -> bool {
        self.correct_index < OPTION_COUNT && self.user_index == self.correct_index as i64
    }

    /// Text of the chosen option, if it names one.
    pub fn user_answer(&self) -> Option<&str> {
        usize::try_from(self.user_index)
            .ok()
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

/// Outcome of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedResult {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub details: Vec<QuestionDetail>,
}

impl GradedResult {
    /// Share of correct answers, 0.0 for an empty quiz.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }

    pub fn unanswered(&self) -> usize {
        self.details.iter().filter(|d| !d.is_answered()).count()
    }

    /// Render the breakdown as a markdown table.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let _ = writeln!(
            md,
            "## Score: {}/{} ({:.0}%)\n",
            self.correct,
            self.total,
            self.percentage()
        );
        md.push_str("| # | Question | Your answer | Correct answer | Result |\n");
        md.push_str("|---|----------|-------------|----------------|--------|\n");
        for (i, detail) in self.details.iter().enumerate() {
            let result = if detail.is_correct() {
                "correct"
            } else if detail.is_answered() {
                "incorrect"
            } else {
                "unanswered"
            };
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} |",
                i + 1,
                detail.question.replace('|', "\\|"),
                detail.user_answer().unwrap_or("-"),
                detail.correct_answer,
                result
            );
        }
        md
    }
}

/// Grade `answers` against `quiz`, in question order.
pub fn grade_submission(quiz: &Quiz, answers: &AnswerSubmission) -> GradedResult {
    let mut correct = 0;
    let details: Vec<QuestionDetail> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let user_index = answers.get(index).unwrap_or(UNANSWERED);
            let detail = QuestionDetail {
                question: question.stem.clone(),
                options: question.options.clone(),
                correct_index: question.answer_index,
                correct_answer: question.correct_answer().to_string(),
                user_index,
            };
            if detail.is_correct() {
                correct += 1;
            }
            detail
        })
        .collect();

    let total = quiz.questions.len();
    tracing::debug!(total, correct, "graded submission");

    GradedResult {
        total,
        correct,
        incorrect: total - correct,
        details,
    }
}
