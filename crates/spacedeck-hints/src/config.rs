//! Configuration file loading and hint provider factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use spacedeck_core::queue::ReviewPolicy;
use spacedeck_core::traits::HintProvider;

use crate::gemini::{
    GeminiProvider, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS,
};
use crate::offline::OfflineProvider;

/// Which hint backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintBackend {
    #[default]
    Gemini,
    Offline,
}

/// The `[hints]` table.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct HintsConfig {
    #[serde(default)]
    pub provider: HintBackend,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl std::fmt::Debug for HintsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HintsConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            provider: HintBackend::default(),
            api_key: None,
            base_url: None,
            model: default_model(),
            timeout_secs: default_timeout(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}
fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

/// Top-level spacedeck configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpacedeckConfig {
    /// Where progress is saved; defaults to the user data directory.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Whether mastered items past their review time re-enter sessions.
    #[serde(default)]
    pub review_policy: ReviewPolicy,
    #[serde(default)]
    pub hints: HintsConfig,
}

impl SpacedeckConfig {
    /// The configured data file, or the default location.
    pub fn data_file(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(default_data_file)
    }
}

fn default_data_file() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("spacedeck")
            .join("progress.json"),
        Err(_) => PathBuf::from("spacedeck-progress.json"),
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `spacedeck.toml` in the current directory
/// 2. `~/.config/spacedeck/config.toml`
///
/// Environment variable override: `SPACEDECK_GEMINI_KEY`.
pub fn load_config() -> Result<SpacedeckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SpacedeckConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("spacedeck.toml");
            if local.exists() {
                Some(local)
            } else {
                config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SpacedeckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SpacedeckConfig::default(),
    };

    if let Ok(key) = std::env::var("SPACEDECK_GEMINI_KEY") {
        config.hints.api_key = Some(key);
    }

    config.hints.api_key = config
        .hints
        .api_key
        .as_deref()
        .map(resolve_env_vars)
        .filter(|key| !key.is_empty());
    config.hints.base_url = config.hints.base_url.as_deref().map(resolve_env_vars);
    config.data_file = config
        .data_file
        .as_deref()
        .and_then(Path::to_str)
        .map(|p| PathBuf::from(resolve_env_vars(p)));

    Ok(config)
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("spacedeck"))
}

/// Create the hint provider described by the config.
///
/// Gemini without an API key falls back to the offline provider.
pub fn create_provider(config: &HintsConfig) -> Result<Box<dyn HintProvider>> {
    match (config.provider, &config.api_key) {
        (HintBackend::Gemini, Some(key)) => {
            let provider =
                GeminiProvider::new(key, config.base_url.clone(), Some(config.model.clone()))?
                    .with_generation(config.temperature, config.max_output_tokens)
                    .with_timeout(config.timeout_secs)?;
            Ok(Box::new(provider))
        }
        (HintBackend::Gemini, None) => {
            tracing::info!("no Gemini API key configured, using offline hints");
            Ok(Box::new(OfflineProvider))
        }
        (HintBackend::Offline, _) => Ok(Box::new(OfflineProvider)),
    }
}
