//! Core domain types for InsightFlow
//!
//! This crate defines the entities shared by every other InsightFlow crate:
//! institutions, departments, forms, responses, analyses, and the session
//! user, plus the validation rules applied before any mutation and the
//! read-only CSV export projection.

pub mod entities;
pub mod enums;
pub mod error;
pub mod export;
pub mod validation;

pub use entities::{
    AiAnalysisResult, AnalysisRecord, AnswerValue, Department, FormField, FormResponse,
    FormTemplate, Institution, InstitutionUpdate, Recommendation, User,
};
pub use enums::{FieldType, RecommendationPriority, SentimentTrend, UserRole};
pub use error::{CoreError, CoreResult, ValidationError};

use uuid::Uuid;

/// Current timestamp as an ISO-8601 string, the format every persisted
/// entity uses.
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Generate a fresh opaque id with the given entity prefix (e.g. `form`).
pub fn fresh_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}
