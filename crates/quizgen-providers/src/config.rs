//! Configuration file loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizgen_core::config::GeneratorConfig;
use quizgen_core::engine::QuizEngineConfig;
use quizgen_core::traits::QuizProvider;

use crate::anthropic::AnthropicProvider;
use crate::openai::OpenAiProvider;

/// File name looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "quizgen.toml";

/// Configuration for a single external provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Anthropic {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

/// Top-level quizgen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgenConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider tried before the heuristic generator; none means heuristic only.
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Max retries on provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Directory for generated quiz documents.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Heuristic generator settings.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f64 {
    0.2
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizzes")
}

impl Default for QuizgenConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            output_dir: default_output_dir(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl QuizgenConfig {
    /// Engine settings derived from this file.
    pub fn engine_config(&self) -> QuizEngineConfig {
        QuizEngineConfig {
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            temperature: self.default_temperature,
            ..Default::default()
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizgen.toml` in the current directory
/// 2. `~/.config/quizgen/config.toml`
///
/// Environment variable overrides: `QUIZGEN_OPENAI_KEY`, `QUIZGEN_ANTHROPIC_KEY`.
pub fn load_config() -> Result<QuizgenConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgenConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                Some(local)
            } else {
                global_config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizgenConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizgenConfig::default(),
    };

    config
        .generator
        .validate()
        .context("invalid [generator] settings")?;

    // Apply env var overrides
    if let Ok(key) = std::env::var("QUIZGEN_ANTHROPIC_KEY") {
        let entry = config
            .providers
            .entry("anthropic".into())
            .or_insert(ProviderConfig::Anthropic {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Anthropic { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("QUIZGEN_OPENAI_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn global_config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgen"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Arc<dyn QuizProvider> {
    match config {
        ProviderConfig::Anthropic { api_key, base_url } => {
            Arc::new(AnthropicProvider::new(api_key, base_url.clone()))
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Arc::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
        )),
    }
}

/// Look up a configured provider by name.
pub fn provider_by_name(config: &QuizgenConfig, name: &str) -> Result<Arc<dyn QuizProvider>> {
    let provider_config = config.providers.get(name).with_context(|| {
        let mut known: Vec<&str> = config.providers.keys().map(String::as_str).collect();
        known.sort_unstable();
        format!(
            "provider '{name}' is not configured (known: {})",
            if known.is_empty() {
                "none".to_string()
            } else {
                known.join(", ")
            }
        )
    })?;
    Ok(create_provider(provider_config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZGEN_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZGEN_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZGEN_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_QUIZGEN_UNSET_VAR}"), "");
        std::env::remove_var("_QUIZGEN_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizgenConfig::default();
        assert!(config.default_provider.is_none());
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.generator.desired_count, 10);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
default_provider = "openai"
default_model = "gpt-4.1-mini"
retry_delay_ms = 250

[generator]
desired_count = 5
title = "Biology Review"

[providers.anthropic]
type = "anthropic"
api_key = "sk-test"

[providers.openai]
type = "openai"
api_key = "sk-openai"
org_id = "org-1"
"#;
        let config: QuizgenConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.default_provider.as_deref(), Some("openai"));
        assert_eq!(config.generator.desired_count, 5);
        assert_eq!(config.generator.title, "Biology Review");
        assert_eq!(config.engine_config().retry_delay, Duration::from_millis(250));
        assert!(matches!(
            config.providers.get("anthropic"),
            Some(ProviderConfig::Anthropic { .. })
        ));
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = ProviderConfig::OpenAI {
            api_key: "sk-secret".into(),
            base_url: None,
            org_id: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[providers.local]\ntype = \"openai\"\napi_key = \"k\"\nbase_url = \"http://localhost:9\"\n",
        )
        .unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert!(config.providers.contains_key("local"));
        assert!(provider_by_name(&config, "local").is_ok());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/quizgen.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn invalid_generator_settings_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[generator]\nmax_phrase_tokens = 9\n").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("max_phrase_tokens"));
    }

    #[test]
    fn unknown_provider_lists_known_names() {
        let err = provider_by_name(&QuizgenConfig::default(), "openai")
            .err()
            .unwrap();
        assert!(err.to_string().contains("known: none"));
    }
}
