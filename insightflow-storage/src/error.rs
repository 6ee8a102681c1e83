//! Error types for storage operations

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted snapshot could not be parsed. Production hydration
    /// recovers from this by falling back to defaults; the variant exists
    /// so tests and callers can still observe the corruption.
    #[error("Corrupt snapshot for key '{key}': {message}")]
    Corrupt { key: String, message: String },

    /// Serializing a collection for persistence failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Referenced form does not exist
    #[error("Form not found: {id}")]
    FormNotFound { id: String },

    /// Mutation rejected before any write happened
    #[error(transparent)]
    Validation(#[from] insightflow_core::ValidationError),
}

impl StorageError {
    /// Create a corrupt-snapshot error
    pub fn corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FormNotFound { .. })
    }
}
