//! Error types for core domain operations

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Core domain errors
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation failed before any mutation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// CSV export failed
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Validation failures, rejected at the point of detection with no partial
/// writes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Form has no title
    #[error("Form title cannot be empty")]
    EmptyTitle,

    /// Form has no fields
    #[error("Form must have at least one field")]
    NoFields,

    /// Choice field without options
    #[error("Choice field '{field_id}' must have at least one option")]
    MissingOptions { field_id: String },

    /// Duplicate field id within one form
    #[error("Field id '{field_id}' appears more than once in the form")]
    DuplicateFieldId { field_id: String },

    /// Required field left unanswered on submission
    #[error("Required field '{label}' is missing an answer")]
    MissingRequired { label: String },
}
