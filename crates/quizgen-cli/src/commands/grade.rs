//! The `quizgen grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizgen_core::document::load_quiz;
use quizgen_core::grading::{grade_submission, GradedResult};
use quizgen_core::model::AnswerSubmission;

pub fn execute(quiz_path: PathBuf, answers_path: PathBuf, format: String) -> Result<()> {
    let quiz = load_quiz(&quiz_path)?;

    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers from {}", answers_path.display()))?;
    let answers: AnswerSubmission =
        serde_json::from_str(&content).context("failed to parse answers JSON")?;

    let result = grade_submission(&quiz, &answers);

    match format.as_str() {
        "text" => print_table(&result),
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "markdown" => print!("{}", result.to_markdown()),
        other => anyhow::bail!("unknown format '{other}' (expected text, json or markdown)"),
    }

    Ok(())
}

fn print_table(result: &GradedResult) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", "Result"]);

    for (i, detail) in result.details.iter().enumerate() {
        let verdict = if detail.is_correct() {
            "correct"
        } else if detail.is_answered() {
            "incorrect"
        } else {
            "unanswered"
        };
        let user_answer = match detail.user_answer() {
            Some(answer) => answer.to_string(),
            None if detail.is_answered() => format!("invalid ({})", detail.user_index),
            None => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&detail.question),
            Cell::new(user_answer),
            Cell::new(&detail.correct_answer),
            Cell::new(verdict),
        ]);
    }

    println!("{table}");
    println!(
        "Score: {}/{} ({:.0}%)",
        result.correct,
        result.total,
        result.percentage()
    );
}
