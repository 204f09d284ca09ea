//! The `quizgen generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use quizgen_core::document::QuizDocument;
use quizgen_core::engine::{QuizEngine, QuizOrigin};
use quizgen_core::sources::{combine_sections, load_text_file, SourceSection};
use quizgen_providers::config::load_config_from;
use quizgen_providers::provider_by_name;

/// Provider name that forces the built-in generator.
const HEURISTIC: &str = "heuristic";

#[derive(Args)]
pub struct GenerateArgs {
    /// Text file to read (repeatable, at most 10)
    #[arg(long = "input", short = 'i')]
    inputs: Vec<PathBuf>,

    /// Notes passed directly on the command line
    #[arg(long)]
    text: Option<String>,

    /// Number of questions (default from config, 10)
    #[arg(long, short = 'n')]
    count: Option<usize>,

    /// Output path for the quiz document
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// External provider to try first, or "heuristic"
    #[arg(long)]
    provider: Option<String>,

    /// Model for the external provider
    #[arg(long)]
    model: Option<String>,

    /// Seed for reproducible option order
    #[arg(long)]
    seed: Option<u64>,
}

pub async fn execute(args: GenerateArgs) -> Result<()> {
    anyhow::ensure!(
        !args.inputs.is_empty() || args.text.is_some(),
        "nothing to generate from: pass --input FILE or --text NOTES"
    );

    let config = load_config_from(args.config.as_deref())?;

    let mut sections = args
        .inputs
        .iter()
        .map(|path| load_text_file(path))
        .collect::<Result<Vec<SourceSection>>>()?;
    if let Some(text) = args.text {
        sections.push(SourceSection::pasted(text));
    }
    let source = combine_sections(&sections)?;

    let count = args.count.unwrap_or(config.generator.desired_count);
    anyhow::ensure!(count >= 1, "count must be at least 1");

    let mut engine_config = config.engine_config();
    engine_config.seed = args.seed;
    let mut engine = QuizEngine::new(config.generator.clone(), engine_config);

    let provider_name = args.provider.or_else(|| config.default_provider.clone());
    if let Some(name) = provider_name.filter(|name| name != HEURISTIC) {
        let provider = provider_by_name(&config, &name)?;
        let model = args.model.unwrap_or_else(|| config.default_model.clone());
        tracing::info!(provider = %name, %model, "using external provider");
        engine = engine.with_provider(provider, model);
    }

    let outcome = engine.generate(&source, count).await;
    if outcome.quiz.is_empty() {
        anyhow::bail!(
            "could not generate any questions; provide longer notes with recurring key terms"
        );
    }

    let document = QuizDocument::new(outcome.quiz);
    let output = args
        .output
        .unwrap_or_else(|| config.output_dir.join(format!("quiz-{}.json", document.id)));
    document
        .save_json(&output)
        .with_context(|| format!("failed to save quiz document {}", document.id))?;

    let origin = match &outcome.origin {
        QuizOrigin::Heuristic => "heuristic generator".to_string(),
        QuizOrigin::External { provider, model } => format!("{provider}/{model}"),
    };
    println!("{}", document.quiz.title);
    println!(
        "Generated {} question(s) of {count} requested ({origin})",
        document.quiz.len()
    );
    for (i, question) in document.quiz.questions.iter().enumerate() {
        println!("  {}. {}", i + 1, question.stem);
    }
    println!("Quiz saved to: {}", output.display());

    Ok(())
}
