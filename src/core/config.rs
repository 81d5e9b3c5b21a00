//! Configuration management for Matchmaker
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/matchmaker/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{MatchError, Result};

/// Longest match-history retention accepted in `data.history_ttl_days`
pub const MAX_HISTORY_TTL_DAYS: i64 = 3650;

/// Main configuration for Matchmaker
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Orchestration loop configuration
    #[serde(default)]
    pub agent: AgentConfig,
    /// Data file locations
    #[serde(default)]
    pub data: DataConfig,
}

/// Ollama server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Host address (default: localhost)
    pub host: String,
    /// Port number (default: 11434)
    pub port: u16,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model used for function calling
    pub name: String,
    /// Sampling temperature
    pub temperature: f32,
}

/// Orchestration loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum model queries per run
    /// Default: 3
    pub max_turns: usize,
    /// An answer must have more than this many non-whitespace characters
    /// Default: 10
    pub min_content_chars: usize,
    /// Timeout for a single model query in seconds
    pub model_timeout_secs: u64,
    /// Whether to show debug output
    pub debug: bool,
}

/// Data file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON file with the people directory
    pub people_path: PathBuf,
    /// JSON file backing the profile store
    pub store_path: PathBuf,
    /// Match history older than this is dropped
    pub history_ttl_days: i64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("OLLAMA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(11434),
            timeout_secs: 120,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: env::var("MATCHMAKER_MODEL").unwrap_or_else(|_| "qwen3:8b".to_string()),
            temperature: 0.7,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_turns: 3,
            min_content_chars: 10,
            model_timeout_secs: 90,
            debug: env::var("MATCHMAKER_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            people_path: env::var("MATCHMAKER_PEOPLE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("people.json")),
            store_path: Config::config_dir().join("store.json"),
            history_ttl_days: 30,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("matchmaker")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        match Self::load_from_file() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(MatchError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| MatchError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text; missing sections use defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| MatchError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the orchestration loop cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.agent.max_turns == 0 {
            return Err(MatchError::config("agent.max_turns must be at least 1"));
        }
        if self.agent.model_timeout_secs == 0 {
            return Err(MatchError::config(
                "agent.model_timeout_secs must be at least 1",
            ));
        }
        if !(1..=MAX_HISTORY_TTL_DAYS).contains(&self.data.history_ttl_days) {
            return Err(MatchError::config(format!(
                "data.history_ttl_days must be between 1 and {}",
                MAX_HISTORY_TTL_DAYS
            )));
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| MatchError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MatchError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(Self::config_file(), content)
            .map_err(|e| MatchError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get the full Ollama API URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }

    /// Per-query model timeout
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.agent.model_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agent.max_turns, 3);
        assert_eq!(config.agent.min_content_chars, 10);
        assert_eq!(config.data.history_ttl_days, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [agent]
            max_turns = 5
            min_content_chars = 20
            model_timeout_secs = 10
            debug = true
            "#,
        )
        .unwrap();

        assert_eq!(config.agent.max_turns, 5);
        assert_eq!(config.model_timeout(), Duration::from_secs(10));
        assert_eq!(config.model.temperature, 0.7);
    }

    #[test]
    fn test_zero_turns_rejected() {
        let err = Config::from_toml(
            r#"
            [agent]
            max_turns = 0
            min_content_chars = 10
            model_timeout_secs = 10
            debug = false
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("max_turns"));
    }

    #[test]
    fn test_history_ttl_bounds() {
        let data = |ttl: i64| {
            format!(
                r#"
                [data]
                people_path = "people.json"
                store_path = "store.json"
                history_ttl_days = {}
                "#,
                ttl
            )
        };

        assert_eq!(
            Config::from_toml(&data(7)).unwrap().data.history_ttl_days,
            7
        );
        for ttl in [0, -5, 100_000_000] {
            let err = Config::from_toml(&data(ttl)).unwrap_err();
            assert!(err.to_string().contains("history_ttl_days"), "ttl {}", ttl);
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("max_turns"));
        assert!(toml_str.contains("people_path"));
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("matchmaker"));
    }
}
