//! Cross-context sync watcher configuration

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Sync watcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Whether the snapshot watcher runs at all
    #[serde(default = "crate::domains::utils::default_true")]
    pub enabled: bool,

    /// Debounce window for coalescing change events, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Validatable for SyncConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.debounce_ms == 0 {
            return Err(self.validation_error("debounce_ms must be greater than 0"));
        }
        if self.debounce_ms > 60_000 {
            return Err(self.validation_error("debounce_ms must not exceed 60000"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "sync"
    }
}
