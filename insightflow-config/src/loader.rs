//! Configuration loading and environment variable handling

use crate::domains::InsightflowConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "INSIGHTFLOW".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<InsightflowConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: InsightflowConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<InsightflowConfig> {
        let mut config = InsightflowConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<InsightflowConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut InsightflowConfig) -> ConfigResult<()> {
        if let Ok(dir) = self.get_env_var("DATA_DIR") {
            config.storage.data_dir = dir.into();
        }

        if let Ok(enabled) = self.get_env_var("SYNC_ENABLED") {
            config.sync.enabled = enabled
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid SYNC_ENABLED: {}", e)))?;
        }
        if let Ok(debounce) = self.get_env_var("SYNC_DEBOUNCE_MS") {
            config.sync.debounce_ms = debounce
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid SYNC_DEBOUNCE_MS: {}", e)))?;
        }

        if let Ok(level) = self.get_env_var("LOG_LEVEL") {
            config.logging.level = crate::domains::logging::LogLevel::from_str(&level)
                .map_err(|e| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", e)))?;
        }

        if let Ok(base_url) = self.get_env_var("AI_BASE_URL") {
            config.ai.base_url = base_url;
        }
        if let Ok(api_key) = self.get_env_var("AI_API_KEY") {
            config.ai.api_key = Some(api_key);
        }
        if let Ok(model) = self.get_env_var("AI_GENERATION_MODEL") {
            config.ai.generation_model = model;
        }
        if let Ok(model) = self.get_env_var("AI_ANALYSIS_MODEL") {
            config.ai.analysis_model = model;
        }
        if let Ok(timeout) = self.get_env_var("AI_TIMEOUT_SECONDS") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid AI_TIMEOUT_SECONDS: {}", e)))?;
            config.ai.timeout = std::time::Duration::from_secs(seconds);
        }

        Ok(())
    }

    /// Get a prefixed environment variable
    fn get_env_var(&self, suffix: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, suffix))
    }
}
