//! Configuration loading, validation, and management for Lifexia.
//!
//! Loads configuration from `~/.lifexia/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.lifexia/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text-generation backend settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Conversation history settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Transcript persistence settings
    #[serde(default)]
    pub transcript: TranscriptConfig,

    /// Knowledge base settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Triage routing settings
    #[serde(default)]
    pub triage: TriageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Base URL of the generation server
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Upper bound on a single generation call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound on the health probe
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,

    /// Replaces the built-in pharmacist system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_backend() -> String {
    "ollama".into()
}
fn default_host() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "qwen2.5:0.5b".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_top_p() -> f32 {
    0.9
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_health_timeout_secs() -> u64 {
    5
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            host: default_host(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: default_timeout_secs(),
            health_timeout_secs: default_health_timeout_secs(),
            system_prompt: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of prior turns carried into generation context
    #[serde(default = "default_window")]
    pub window: usize,

    /// Default number of turns returned by history listings
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

fn default_window() -> usize {
    5
}
fn default_list_limit() -> usize {
    50
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            list_limit: default_list_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// "sqlite", "memory" or "none"
    #[serde(default = "default_transcript_backend")]
    pub backend: String,

    /// SQLite database path; defaults to `~/.lifexia/transcripts.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn default_transcript_backend() -> String {
    "sqlite".into()
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            backend: default_transcript_backend(),
            path: None,
        }
    }
}

impl TranscriptConfig {
    /// The configured database path, or the default under the config dir.
    pub fn resolved_path(&self) -> String {
        self.path.clone().unwrap_or_else(|| {
            AppConfig::config_dir()
                .join("transcripts.db")
                .display()
                .to_string()
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// JSON file of drug records; the built-in seed set is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub entity_answers: EntityAnswers,
}

/// How a resolved knowledge-base record is turned into a reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityAnswers {
    /// Render the record with the fixed response template
    #[default]
    Template,
    /// Hand the record to the generator as context
    Generation,
}

const TRANSCRIPT_BACKENDS: &[&str] = &["sqlite", "memory", "none"];
const GENERATION_BACKENDS: &[&str] = &["ollama"];

impl AppConfig {
    /// Load configuration from the default path (~/.lifexia/config.toml).
    ///
    /// Environment variables override file values:
    /// - `LIFEXIA_OLLAMA_HOST` / `OLLAMA_HOST`
    /// - `LIFEXIA_MODEL` / `OLLAMA_MODEL`
    /// - `LIFEXIA_HISTORY_WINDOW`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from `path`, then apply environment overrides and re-validate.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
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

    /// Apply overrides from a key lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("LIFEXIA_OLLAMA_HOST").or_else(|| lookup("OLLAMA_HOST")) {
            self.generation.host = host;
        }

        if let Some(model) = lookup("LIFEXIA_MODEL").or_else(|| lookup("OLLAMA_MODEL")) {
            self.generation.model = model;
        }

        if let Some(window) = lookup("LIFEXIA_HISTORY_WINDOW") {
            self.history.window = window.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "LIFEXIA_HISTORY_WINDOW must be a positive integer, got '{window}'"
                ))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".lifexia")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.generation;

        if !GENERATION_BACKENDS.contains(&generation.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown generation backend '{}'",
                generation.backend
            )));
        }

        if generation.temperature < 0.0 || generation.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if generation.top_p <= 0.0 || generation.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "generation.top_p must be in (0.0, 1.0]".into(),
            ));
        }

        if generation.timeout_secs == 0 || generation.health_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "generation timeouts must be at least 1 second".into(),
            ));
        }

        if self.history.window == 0 {
            return Err(ConfigError::ValidationError(
                "history.window must be at least 1".into(),
            ));
        }

        if !TRANSCRIPT_BACKENDS.contains(&self.transcript.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown transcript backend '{}' (expected one of: {})",
                self.transcript.backend,
                TRANSCRIPT_BACKENDS.join(", ")
            )));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
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
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generation.timeout_secs, 60);
        assert_eq!(config.history.window, 5);
        assert_eq!(config.triage.entity_answers, EntityAnswers::Template);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.generation.model, config.generation.model);
        assert_eq!(parsed.transcript.backend, config.transcript.backend);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.generation.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_window_rejected() {
        let mut config = AppConfig::default();
        config.history.window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_transcript_backend_rejected() {
        let mut config = AppConfig::default();
        config.transcript.backend = "mongo".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mongo"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.generation.host, "http://localhost:11434");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[generation]
model = "llama3.2:1b"
timeout_secs = 30

[triage]
entity_answers = "generation"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.generation.model, "llama3.2:1b");
        assert_eq!(config.generation.timeout_secs, 30);
        assert_eq!(config.generation.host, "http://localhost:11434");
        assert_eq!(config.history.window, 5);
        assert_eq!(config.triage.entity_answers, EntityAnswers::Generation);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generation\nmodel = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides_apply_in_priority_order() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LIFEXIA_OLLAMA_HOST", "http://gpu-box:11434"),
            ("OLLAMA_HOST", "http://ignored:11434"),
            ("OLLAMA_MODEL", "phi3"),
            ("LIFEXIA_HISTORY_WINDOW", "8"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.generation.host, "http://gpu-box:11434");
        assert_eq!(config.generation.model, "phi3");
        assert_eq!(config.history.window, 8);
    }

    #[test]
    fn bad_window_override_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|k| {
            (k == "LIFEXIA_HISTORY_WINDOW").then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("qwen2.5:0.5b"));
        assert!(toml_str.contains("[history]"));
    }
}
