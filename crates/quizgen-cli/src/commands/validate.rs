//! The `quizgen validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgen_core::document::load_quiz;
use quizgen_core::validate::{parse_external_quiz, validate_quiz};

pub fn execute(quiz_path: PathBuf, raw: bool) -> Result<()> {
    let quiz = if raw {
        let content = std::fs::read_to_string(&quiz_path)
            .with_context(|| format!("failed to read {}", quiz_path.display()))?;
        parse_external_quiz(&content)
            .with_context(|| format!("{} is not a usable quiz", quiz_path.display()))?
    } else {
        load_quiz(&quiz_path)?
    };

    println!("Quiz: {} ({} questions)", quiz.title, quiz.len());

    let warnings = validate_quiz(&quiz);
    for w in &warnings {
        let prefix = w
            .question
            .map(|index| format!("  [q{}]", index + 1))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Quiz is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
