//! quizgen-providers: External quiz generators.
//!
//! Implements the `QuizProvider` trait for OpenAI-compatible chat completion
//! endpoints and the Anthropic messages API, plus the `quizgen.toml` loader
//! that decides which one (if any) the engine tries first.

pub mod anthropic;
pub mod config;
mod http;
pub mod mock;
pub mod openai;

pub use config::{
    create_provider, load_config, load_config_from, provider_by_name, ProviderConfig,
    QuizgenConfig,
};
pub use quizgen_core::error::ProviderError;
