//! Error types for session operations

use thiserror::Error;

/// Result type for session/visibility operations
pub type RbacResult<T> = Result<T, RbacError>;

/// Session and visibility errors
#[derive(Error, Debug)]
pub enum RbacError {
    /// Persisting or clearing the session failed
    #[error("Session storage error: {0}")]
    Storage(#[from] insightflow_storage::StorageError),

    /// Login input could not be used
    #[error("Invalid login: {message}")]
    InvalidLogin { message: String },
}

impl RbacError {
    /// Create an invalid-login error
    pub fn invalid_login(message: impl Into<String>) -> Self {
        Self::InvalidLogin {
            message: message.into(),
        }
    }
}
