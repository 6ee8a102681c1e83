//! Domain-specific configuration modules

pub mod ai;
pub mod logging;
pub mod storage;
pub mod sync;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main InsightFlow configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InsightflowConfig {
    /// Durable snapshot storage configuration
    #[serde(default)]
    pub storage: storage::StorageConfig,

    /// Cross-context sync watcher configuration
    #[serde(default)]
    pub sync: sync::SyncConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// AI collaborator configuration
    #[serde(default)]
    pub ai: ai::AiConfig,
}

impl InsightflowConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.storage.validate()?;
        self.sync.validate()?;
        self.logging.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = InsightflowConfig::default();
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = InsightflowConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: InsightflowConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.storage.data_dir, config.storage.data_dir);
        assert_eq!(back.ai.base_url, config.ai.base_url);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: InsightflowConfig =
            serde_yaml::from_str("storage:\n  data_dir: /tmp/insightflow\n").unwrap();
        assert_eq!(
            config.storage.data_dir,
            std::path::PathBuf::from("/tmp/insightflow")
        );
        assert!(config.sync.enabled);
    }
}
