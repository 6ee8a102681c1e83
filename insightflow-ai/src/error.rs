//! Error types for AI operations

use thiserror::Error;

/// Result type for AI operations
pub type AiResult<T> = Result<T, AiError>;

/// AI collaborator errors. Every failure surfaces as a single outcome to
/// the immediate caller; the store never retries and never commits a
/// partial result.
#[derive(Error, Debug)]
pub enum AiError {
    /// Transport failure
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("AI service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Response did not match the contract shape
    #[error("Invalid AI response: {message}")]
    InvalidResponse { message: String },

    /// No API key configured
    #[error("AI API key is missing; set INSIGHTFLOW_AI_API_KEY")]
    MissingApiKey,
}

impl AiError {
    /// Create an invalid-response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a service error
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }
}
