//! quizgen CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::generate::GenerateArgs;

#[derive(Parser)]
#[command(
    name = "quizgen",
    version,
    about = "Generate multiple-choice quizzes from study notes and grade answers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz from text files or pasted notes
    Generate(GenerateArgs),

    /// Grade a submission against a quiz
    Grade {
        /// Quiz document or bare quiz JSON
        #[arg(long)]
        quiz: PathBuf,

        /// Answers JSON: {"0": 2, "1": 0} or {"answers": {...}}
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check a quiz file for problems
    Validate {
        /// Quiz document or bare quiz JSON
        #[arg(long)]
        quiz: PathBuf,

        /// Treat the file as a raw external generator response
        #[arg(long)]
        raw: bool,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example notes
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizgen=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args).await,
        Commands::Grade {
            quiz,
            answers,
            format,
        } => commands::grade::execute(quiz, answers, format),
        Commands::Validate { quiz, raw } => commands::validate::execute(quiz, raw),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
