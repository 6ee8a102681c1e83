//! Error types for the sync watcher

use thiserror::Error;

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync watcher errors
#[derive(Error, Debug)]
pub enum SyncError {
    /// Creating or registering the filesystem watcher failed
    #[error("Watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// Reading a changed snapshot failed
    #[error("Storage error: {0}")]
    Storage(#[from] insightflow_storage::StorageError),

    /// Internal channel closed unexpectedly
    #[error("Event channel error: {message}")]
    Channel { message: String },
}

impl SyncError {
    /// Create a channel error
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }
}
