//! The `quizgen list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use quizgen_providers::config::load_config_from;
use quizgen_providers::create_provider;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;

    for name in names {
        if provider_filter.as_ref().is_some_and(|filter| filter != name) {
            continue;
        }

        let provider = create_provider(&config.providers[name]);
        let models = provider.available_models();

        if !models.is_empty() {
            found_any = true;
            let marker = if config.default_provider.as_ref() == Some(name) {
                " (default)"
            } else {
                ""
            };
            println!("Provider: {name}{marker}");
            for model in &models {
                println!(
                    "  {} - {} ({}K context)",
                    model.id,
                    model.name,
                    model.max_context / 1000,
                );
            }
            println!();
        }
    }

    if !found_any {
        println!("No providers configured. Run `quizgen init` to create a config file.");
    }
    println!("The built-in heuristic generator is always available as `--provider heuristic`.");

    Ok(())
}
