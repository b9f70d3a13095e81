//! Configuration management for Fitsage
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{FitsageError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config location relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Main configuration structure for Fitsage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider endpoint and model registry
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Chat surface settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Plan generation settings
    #[serde(default)]
    pub plan: PlanConfig,
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Chat endpoint accepting the streaming message protocol
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used for chat and summarization
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used for fitness-plan generation
    #[serde(default = "default_plan_model")]
    pub plan_model: String,

    /// Models available for selection
    #[serde(default = "default_models")]
    pub models: Vec<String>,
}

fn default_endpoint() -> String {
    "http://localhost:3000/api/chat".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_chat_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_plan_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "gemini-3-flash-preview".to_string(),
        "gemini-2.5-pro".to_string(),
        "gemini-2.5-flash".to_string(),
        "gemini-2.5-flash-lite".to_string(),
    ]
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            chat_model: default_chat_model(),
            plan_model: default_plan_model(),
            models: default_models(),
        }
    }
}

/// Chat surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Cap on response length per turn
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Override for the built-in system prompt
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_max_output_tokens() -> u32 {
    500
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: default_max_output_tokens(),
            system_prompt: None,
        }
    }
}

/// Plan generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Sampling temperature; plans want low variance
    #[serde(default = "default_plan_temperature")]
    pub temperature: f64,
}

fn default_plan_temperature() -> f64 {
    0.2
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            temperature: default_plan_temperature(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            chat: ChatConfig::default(),
            plan: PlanConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment overrides.
    ///
    /// A missing file is not an error; defaults are used, with the user
    /// config directory checked as a fallback location.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                Self::from_file(&user_path.to_string_lossy())?
            } else {
                tracing::warn!("Config file not found at {}, using defaults", path);
                Self::default()
            }
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        Ok(config)
    }

    /// Per-user fallback config location
    fn user_config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("", "", "fitsage")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FitsageError::Config(format!("Failed to read config file: {e}")))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| FitsageError::Config(format!("Failed to parse config: {e}")).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(endpoint) = std::env::var("FITSAGE_ENDPOINT") {
            self.provider.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("FITSAGE_CHAT_MODEL") {
            self.provider.chat_model = model;
        }
        if let Ok(model) = std::env::var("FITSAGE_PLAN_MODEL") {
            self.provider.plan_model = model;
        }
    }

    /// Resolve the API key from the environment.
    ///
    /// `FITSAGE_API_KEY` wins; otherwise the configured `api_key_env`
    /// variable (defaults to `GEMINI_API_KEY`) is consulted. `None` means
    /// the endpoint is called without authentication.
    pub fn api_key(&self) -> Option<String> {
        std::env::var("FITSAGE_API_KEY")
            .or_else(|_| std::env::var(&self.provider.api_key_env))
            .ok()
            .filter(|k| !k.is_empty())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `FitsageError::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.provider.endpoint).map_err(|e| {
            FitsageError::Config(format!(
                "Invalid endpoint '{}': {e}",
                self.provider.endpoint
            ))
        })?;

        if self.provider.chat_model.is_empty() {
            return Err(FitsageError::Config("Chat model cannot be empty".to_string()).into());
        }
        if self.provider.plan_model.is_empty() {
            return Err(FitsageError::Config("Plan model cannot be empty".to_string()).into());
        }
        if self.provider.models.is_empty() {
            return Err(
                FitsageError::Config("Model registry cannot be empty".to_string()).into(),
            );
        }
        if self.chat.max_output_tokens == 0 {
            return Err(FitsageError::Config(
                "max_output_tokens must be greater than 0".to_string(),
            )
            .into());
        }
        if !(0.0..=2.0).contains(&self.plan.temperature) {
            return Err(FitsageError::Config(format!(
                "Plan temperature {} must be between 0.0 and 2.0",
                self.plan.temperature
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.provider.chat_model, "gemini-2.5-flash");
        assert_eq!(config.chat.max_output_tokens, 500);
        assert_eq!(config.provider.models.len(), 4);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
provider:
  endpoint: "https://chat.example.com/api/chat"
  chat_model: "gemini-2.5-pro"
chat:
  max_output_tokens: 1000
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.provider.endpoint, "https://chat.example.com/api/chat");
        assert_eq!(config.provider.chat_model, "gemini-2.5-pro");
        assert_eq!(config.chat.max_output_tokens, 1000);
        // Unspecified sections fall back to defaults.
        assert_eq!(config.provider.plan_model, "llama-3.3-70b-versatile");
        assert!((config.plan.temperature - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "provider: [not, a, mapping").unwrap();
        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.provider.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_output_tokens() {
        let mut config = Config::default();
        config.chat.max_output_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut config = Config::default();
        config.plan.temperature = 3.5;
        assert!(config.validate().is_err());
    }
}
