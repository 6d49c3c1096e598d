//! Service configuration and backend factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizcoach_core::feedback::GeneratorConfig;
use quizcoach_core::traits::ChatProvider;

use crate::mistral::MistralProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single chat backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAi {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Mistral {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAi {
                api_key: _,
                base_url,
            } => f
                .debug_struct("OpenAi")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mistral {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Mistral")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// Top-level quizcoach configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizcoachConfig {
    /// Backend configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Which backend to use, chosen once at startup.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Model identifier passed to the backend.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Max tokens per feedback reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Directory holding quiz.json, answers.json, details.json, and the
    /// prompt templates.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Listen port for the HTTP server.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_backend() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-4-turbo".to_string()
}
fn default_temperature() -> f64 {
    0.5
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_port() -> u16 {
    3001
}

impl Default for QuizcoachConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            backend: default_backend(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            data_dir: default_data_dir(),
            port: default_port(),
        }
    }
}

impl QuizcoachConfig {
    /// Sampling settings for the feedback generator.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
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

/// Resolve env vars in a backend config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAi { api_key, base_url } => ProviderConfig::OpenAi {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Mistral { api_key, base_url } => ProviderConfig::Mistral {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizcoach.toml` in the current directory
/// 2. `~/.config/quizcoach/config.toml`
///
/// Environment overrides: `QUIZCOACH_BACKEND` selects the backend,
/// `QUIZCOACH_OPENAI_KEY` / `QUIZCOACH_MISTRAL_KEY` supply credentials.
pub fn load_config() -> Result<QuizcoachConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizcoachConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizcoach.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizcoachConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizcoachConfig::default(),
    };

    // Apply env var overrides
    if let Ok(backend) = std::env::var("QUIZCOACH_BACKEND") {
        config.backend = backend;
    }

    if let Ok(key) = std::env::var("QUIZCOACH_OPENAI_KEY") {
        config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAi {
                api_key: String::new(),
                base_url: None,
            });
        if let Some(ProviderConfig::OpenAi { api_key, .. }) = config.providers.get_mut("openai") {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("QUIZCOACH_MISTRAL_KEY") {
        config
            .providers
            .entry("mistral".into())
            .or_insert(ProviderConfig::Mistral {
                api_key: String::new(),
                base_url: None,
            });
        if let Some(ProviderConfig::Mistral { api_key, .. }) = config.providers.get_mut("mistral")
        {
            *api_key = key;
        }
    }

    // Resolve env vars in all backend configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizcoach"))
}

/// Create the configured backend. A missing credential or an unknown
/// backend name is fatal: the process must not serve traffic without a
/// working backend.
pub fn create_provider(config: &QuizcoachConfig) -> Result<Arc<dyn ChatProvider>> {
    let provider_config = config.providers.get(&config.backend).with_context(|| {
        format!(
            "backend '{}' is not configured (known backends: openai, mistral, ollama)",
            config.backend
        )
    })?;

    match provider_config {
        ProviderConfig::OpenAi { api_key, base_url } => {
            if api_key.is_empty() {
                anyhow::bail!("openai backend selected but no API key supplied");
            }
            Ok(Arc::new(OpenAiProvider::new(api_key, base_url.clone())))
        }
        ProviderConfig::Mistral { api_key, base_url } => {
            if api_key.is_empty() {
                anyhow::bail!("mistral backend selected but no API key supplied");
            }
            Ok(Arc::new(MistralProvider::new(api_key, base_url.clone())))
        }
        ProviderConfig::Ollama { base_url } => Ok(Arc::new(OllamaProvider::new(base_url))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZCOACH_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZCOACH_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZCOACH_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_QUIZCOACH_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizcoachConfig::default();
        assert_eq!(config.backend, "openai");
        assert_eq!(config.model, "gpt-4-turbo");
        assert_eq!(config.port, 3001);
        assert_eq!(config.temperature, 0.5);
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
backend = "mistral"
model = "open-mixtral-8x22b"
data_dir = "./data"

[providers.openai]
type = "openai"
api_key = "sk-test"

[providers.mistral]
type = "mistral"
api_key = "sk-mistral"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;
        let config: QuizcoachConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 3);
        assert_eq!(config.backend, "mistral");
        assert!(matches!(
            config.providers.get("mistral"),
            Some(ProviderConfig::Mistral { .. })
        ));
    }

    #[test]
    fn unknown_backend_is_fatal() {
        let config = QuizcoachConfig {
            backend: "carrier-pigeon".into(),
            ..Default::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn missing_credential_is_fatal() {
        let mut config = QuizcoachConfig::default();
        config.providers.insert(
            "openai".into(),
            ProviderConfig::OpenAi {
                api_key: String::new(),
                base_url: None,
            },
        );
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("no API key"));
    }

    #[test]
    fn ollama_needs_no_credential() {
        let mut config = QuizcoachConfig {
            backend: "ollama".into(),
            ..Default::default()
        };
        config.providers.insert(
            "ollama".into(),
            ProviderConfig::Ollama {
                base_url: default_ollama_url(),
            },
        );
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = ProviderConfig::OpenAi {
            api_key: "sk-secret".into(),
            base_url: None,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("***"));
    }
}
