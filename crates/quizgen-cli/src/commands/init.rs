//! The `quizgen init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizgen.toml").exists() {
        println!("quizgen.toml already exists, skipping.");
    } else {
        std::fs::write("quizgen.toml", SAMPLE_CONFIG)?;
        println!("Created quizgen.toml");
    }

    std::fs::create_dir_all("notes")?;
    let example_path = Path::new("notes/example.txt");
    if example_path.exists() {
        println!("notes/example.txt already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_NOTES)?;
        println!("Created notes/example.txt");
    }

    println!("\nNext steps:");
    println!("  1. Optionally set default_provider and API keys in quizgen.toml");
    println!("  2. Run: quizgen generate --input notes/example.txt --output quiz.json");
    println!("  3. Run: quizgen grade --quiz quiz.json --answers answers.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizgen configuration

# External provider tried before the built-in generator.
# Leave unset to generate offline.
# default_provider = "openai"
default_model = "gpt-4o-mini"
default_temperature = 0.2
max_retries = 3
retry_delay_ms = 1000
output_dir = "./quizzes"

[generator]
desired_count = 10
min_sentence_length = 35
max_phrase_tokens = 3
min_keyword_length = 4
title = "Auto-generated Quiz"
extra_stopwords = []

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"
"#;

const EXAMPLE_NOTES: &str = "Photosynthesis converts light energy into chemical energy inside chloroplasts.
Chlorophyll pigments absorb light energy mostly in the blue and red wavelengths.
The Calvin cycle fixes carbon dioxide into sugars using chemical energy.
Stomata regulate carbon dioxide intake and water loss in plant leaves.
Cellular respiration releases the chemical energy stored in glucose molecules.
Mitochondria produce most of the cell's energy during cellular respiration.
";
