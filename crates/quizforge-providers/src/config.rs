//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizforge_core::engine::{EngineConfig, QuizEngine};
use quizforge_core::model::ProviderKind;
use quizforge_core::traits::{CallOptions, LlmProvider};

use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;

/// Environment variable holding the Gemini API key.
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable holding the OpenAI API key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
                model,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .field("model", model)
                .finish(),
        }
    }
}

impl ProviderConfig {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::Gemini { .. } => ProviderKind::Gemini,
            ProviderConfig::OpenAI { .. } => ProviderKind::OpenAi,
        }
    }

    fn api_key(&self) -> &str {
        match self {
            ProviderConfig::Gemini { api_key, .. } | ProviderConfig::OpenAI { api_key, .. } => {
                api_key
            }
        }
    }

    /// A provider without a credential counts as not configured.
    pub fn has_credential(&self) -> bool {
        !self.api_key().trim().is_empty()
    }

    fn set_api_key(&mut self, key: String) {
        match self {
            ProviderConfig::Gemini { api_key, .. } | ProviderConfig::OpenAI { api_key, .. } => {
                *api_key = key
            }
        }
    }

    fn empty(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Gemini => ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
                model: None,
            },
            ProviderKind::OpenAi => ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
                model: None,
            },
        }
    }
}

/// Top-level quizforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Sampling temperature for test generation.
    #[serde(default = "default_generation_temperature")]
    pub generation_temperature: f64,
    /// Sampling temperature for answer grading (0.0 for stable scores).
    #[serde(default)]
    pub evaluation_temperature: f64,
    /// Token ceiling for answer grading.
    #[serde(default = "default_evaluation_max_tokens")]
    pub evaluation_max_tokens: u32,
    /// Where generated tests are stored.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_generation_temperature() -> f64 {
    0.7
}
fn default_evaluation_max_tokens() -> u32 {
    300
}
fn default_store_path() -> PathBuf {
    PathBuf::from("./quizforge-tests.json")
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            generation_temperature: default_generation_temperature(),
            evaluation_temperature: 0.0,
            evaluation_max_tokens: default_evaluation_max_tokens(),
            store_path: default_store_path(),
        }
    }
}

impl QuizforgeConfig {
    /// Call options handed to the engine.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            generation: CallOptions {
                temperature: Some(self.generation_temperature),
                max_tokens: None,
            },
            evaluation: CallOptions {
                temperature: Some(self.evaluation_temperature),
                max_tokens: Some(self.evaluation_max_tokens),
            },
        }
    }

    /// Names of providers that carry a credential, sorted.
    pub fn configured_providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .providers
            .iter()
            .filter(|(_, p)| p.has_credential())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never expanded again.
fn resolve_env_vars(s: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut result = s.to_string();
    let mut cursor = 0;
    while let Some(offset) = result[cursor..].find("${") {
        let start = cursor + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = lookup(&result[start + 2..start + end]).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
        cursor = start + value.len();
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(
    config: &ProviderConfig,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> ProviderConfig {
    let resolve = |s: &str| resolve_env_vars(s, lookup);
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => ProviderConfig::Gemini {
            api_key: resolve(api_key),
            base_url: base_url.as_deref().map(resolve),
            model: model.as_deref().map(resolve),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
            model,
        } => ProviderConfig::OpenAI {
            api_key: resolve(api_key),
            base_url: base_url.as_deref().map(resolve),
            org_id: org_id.as_deref().map(resolve),
            model: model.as_deref().map(resolve),
        },
    }
}

/// Apply `GEMINI_API_KEY` / `OPENAI_API_KEY` overrides and resolve `${VAR}`
/// references, reading variables through `lookup`.
pub fn apply_env(
    mut config: QuizforgeConfig,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> QuizforgeConfig {
    for (var, name, kind) in [
        (GEMINI_KEY_VAR, "gemini", ProviderKind::Gemini),
        (OPENAI_KEY_VAR, "openai", ProviderKind::OpenAi),
    ] {
        let Some(key) = lookup(var).filter(|k| !k.trim().is_empty()) else {
            continue;
        };
        // Override every entry of this kind, or add one under the default name.
        let mut found = false;
        for provider in config.providers.values_mut().filter(|p| p.kind() == kind) {
            provider.set_api_key(key.clone());
            found = true;
        }
        if !found {
            let mut provider = ProviderConfig::empty(kind);
            provider.set_api_key(key);
            config.providers.insert(name.to_string(), provider);
        }
    }

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v, lookup)))
        .collect();
    config
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// Environment variable overrides: `GEMINI_API_KEY`, `OPENAI_API_KEY`.
pub fn load_config() -> Result<QuizforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
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

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizforgeConfig::default(),
    };

    Ok(apply_env(config, &|var: &str| std::env::var(var).ok()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => Arc::new(GeminiProvider::new(
            api_key,
            base_url.clone(),
            model.clone(),
        )?),
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
            model,
        } => Arc::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
            model.clone(),
        )?),
    };
    Ok(provider)
}

/// Build an engine with one adapter per credentialed backend.
///
/// Fails when no backend has a credential: that is a startup error, not a
/// per-request one.
pub fn build_engine(config: &QuizforgeConfig) -> Result<QuizEngine> {
    let mut engine = QuizEngine::new(config.engine_config());
    let mut registered = Vec::new();

    for name in config.configured_providers() {
        let provider_config = &config.providers[name];
        let kind = provider_config.kind();
        if registered.contains(&kind) {
            tracing::warn!("provider '{name}' replaces an earlier {kind} entry");
        }
        let provider = create_provider(provider_config)
            .with_context(|| format!("failed to create provider '{name}'"))?;
        tracing::debug!(provider = name, model = provider.model(), "registered provider");
        engine = engine.with_provider(provider);
        registered.push(kind);
    }

    anyhow::ensure!(
        !registered.is_empty(),
        "no provider credentials configured: set {GEMINI_KEY_VAR} or {OPENAI_KEY_VAR}, \
         or add a provider to quizforge.toml"
    );
    Ok(engine)
}
