//! Configuration loading, validation, and management for stagecrew.
//!
//! Loads configuration from `~/.stagecrew/config.toml` with environment
//! variable overrides. The loaded [`AppConfig`] is passed explicitly to the
//! provider router and the team builder; nothing reads it from global state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.stagecrew/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Max tokens per LLM response (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_tokens: Option<u32>,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Analysis team settings
    #[serde(default)]
    pub team: TeamConfig,
}

fn default_provider() -> String {
    "ollama".into()
}
fn default_model() -> String {
    "mistral:latest".into()
}
fn default_temperature() -> f32 {
    0.0
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("providers", &self.providers)
            .field("team", &self.team)
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// Settings for the classifier → keywords → summarizer team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Categories the classifier chooses from
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// How many keywords the keyword agent extracts
    #[serde(default = "default_keyword_count")]
    pub keyword_count: usize,

    /// Word limit for the summary
    #[serde(default = "default_summary_max_words")]
    pub summary_max_words: usize,

    /// Per-agent time limit on the provider call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_timeout_secs: Option<u64>,
}

fn default_categories() -> Vec<String> {
    [
        "News",
        "Personal Blog",
        "Technical Article",
        "Marketing",
        "Educational",
        "Other",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_keyword_count() -> usize {
    5
}
fn default_summary_max_words() -> usize {
    15
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            keyword_count: default_keyword_count(),
            summary_max_words: default_summary_max_words(),
            stage_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.stagecrew/config.toml).
    ///
    /// Also checks environment variables:
    /// - `STAGECREW_API_KEY`, `OPENROUTER_API_KEY`, `OPENAI_API_KEY` (first found,
    ///   only when the file sets no key)
    /// - `STAGECREW_PROVIDER`
    /// - `STAGECREW_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_overrides(&Self::config_path())
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_with_overrides(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("STAGECREW_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("STAGECREW_PROVIDER") {
            config.default_provider = provider;
        }

        if let Ok(model) = std::env::var("STAGECREW_MODEL") {
            config.default_model = model;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".stagecrew")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.team.categories.is_empty() {
            return Err(ConfigError::ValidationError(
                "team.categories must list at least one category".into(),
            ));
        }

        if self.team.keyword_count == 0 {
            return Err(ConfigError::ValidationError(
                "team.keyword_count must be at least 1".into(),
            ));
        }

        if self.team.summary_max_words == 0 {
            return Err(ConfigError::ValidationError(
                "team.summary_max_words must be at least 1".into(),
            ));
        }

        if self.team.stage_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "team.stage_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// The model requests go to: the default provider's `default_model`,
    /// else the global `default_model`.
    pub fn active_model(&self) -> &str {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| p.default_model.as_deref())
            .unwrap_or(self.default_model.as_str())
    }

    /// Whether the default provider runs locally and needs no key.
    pub fn is_local_provider(&self) -> bool {
        matches!(
            self.default_provider.as_str(),
            "ollama" | "vllm" | "llamacpp" | "llama.cpp"
        )
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: None,
            providers: HashMap::new(),
            team: TeamConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn active_model_prefers_default_providers_entry() {
        let mut config = AppConfig::default();
        assert_eq!(config.active_model(), "mistral:latest");

        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                default_model: Some("gpt-4o-mini".into()),
                ..Default::default()
            },
        );
        assert_eq!(config.active_model(), "mistral:latest");

        config.default_provider = "openai".into();
        assert_eq!(config.active_model(), "gpt-4o-mini");
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "ollama");
        assert_eq!(config.default_model, "mistral:latest");
        assert_eq!(config.team.keyword_count, 5);
        assert_eq!(config.team.summary_max_words, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.team.categories, config.team.categories);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_keyword_count_rejected() {
        let mut config = AppConfig::default();
        config.team.keyword_count = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("keyword_count"));
    }

    #[test]
    fn empty_categories_rejected() {
        let mut config = AppConfig::default();
        config.team.categories.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.team.stage_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.default_provider, "ollama");
    }

    #[test]
    fn load_team_section_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
default_provider = "openai"
default_model = "gpt-4o-mini"

[team]
categories = ["Sports", "Politics"]
keyword_count = 3
stage_timeout_secs = 30
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.team.categories, vec!["Sports", "Politics"]);
        assert_eq!(config.team.keyword_count, 3);
        assert_eq!(config.team.summary_max_words, 15);
        assert_eq!(config.team.stage_timeout_secs, Some(30));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_temperature = \"hot\"").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("ollama"));
        assert!(toml_str.contains("mistral:latest"));
        assert!(toml_str.contains("[team]"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn local_provider_needs_no_key() {
        let config = AppConfig::default();
        assert!(config.is_local_provider());
        assert!(!config.has_api_key());
    }
}
