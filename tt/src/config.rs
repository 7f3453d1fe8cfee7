//! TaskTracker configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default assistant role/goals sent as context with every completion request
pub const DEFAULT_CONTEXT: &str = "You are an assistant for a task management app. \
     Help the user manage their tasks, suggest new tasks, and answer questions about productivity.";

/// Main TaskTracker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion service configuration
    pub llm: LlmConfig,

    /// Assistant behavior configuration
    pub assistant: AssistantConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the API key is resolvable. Call this early in startup to
    /// fail fast with a clear error message.
    pub fn validate(&self) -> Result<()> {
        self.llm
            .get_api_key()
            .map(|_| ())
            .context("Completion service API key not found")
    }

    /// Load configuration with fallback chain
    ///
    /// Explicit path, then `.tasktracker.yml` in the working directory, then
    /// `~/.config/tasktracker/config.yml`, then built-in defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from(".tasktracker.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!("Ignoring unreadable {}: {}", local_config.display(), e),
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tasktracker").join("config.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Ignoring unreadable {}: {}", user_config.display(), e),
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific YAML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .context(format!("Failed to read config file {}", path.as_ref().display()))?;
        let config: Self = serde_yaml::from_str(&contents)
            .context(format!("Failed to parse config file {}", path.as_ref().display()))?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "gemini" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Optional file containing the API key (used when the env var is unset)
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Resolve the API key from the environment or, failing that, the key file
    pub fn get_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(&self.api_key_env) {
            let key = key.trim().to_string();
            if !key.is_empty() {
                return Ok(key);
            }
        }

        if let Some(path) = &self.api_key_file {
            let key = fs::read_to_string(path)
                .context(format!("Failed to read API key file {}", path.display()))?
                .trim()
                .to_string();
            if !key.is_empty() {
                return Ok(key);
            }
        }

        Err(eyre::eyre!(
            "Set the {} environment variable or configure api-key-file",
            self.api_key_env
        ))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-1.5-pro".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key_file: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 1000,
            timeout_ms: 30_000,
        }
    }
}

/// Assistant behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Fixed context string describing the assistant's role and goals
    pub context: String,

    /// How many recent messages accompany each request
    #[serde(rename = "history-limit")]
    pub history_limit: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT.to_string(),
            history_limit: 5,
        }
    }
}
