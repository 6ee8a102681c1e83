//! Domain-driven configuration management for InsightFlow
//!
//! Configuration is split by functional domain (storage, sync, logging,
//! AI), with validation, defaults, and environment variable support under
//! the `INSIGHTFLOW_` prefix.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    ai::AiConfig, logging::LoggingConfig, storage::StorageConfig, sync::SyncConfig,
    InsightflowConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
