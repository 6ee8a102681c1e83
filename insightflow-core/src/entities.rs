//! Domain entities
//!
//! All identifiers are opaque strings and all timestamps are ISO-8601
//! strings. Field names serialize as camelCase to stay compatible with the
//! persisted snapshot layout.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::enums::{FieldType, RecommendationPriority, SentimentTrend, UserRole};

/// Root tenant entity; owns departments and forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: String,
    pub name: String,
    pub logo_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub created_at: String,
}

/// Partial institution fields for branding updates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
}

impl InstitutionUpdate {
    /// Merge the provided fields into an existing institution
    pub fn apply_to(&self, institution: &mut Institution) {
        if let Some(name) = &self.name {
            institution.name = name.clone();
        }
        if let Some(logo_url) = &self.logo_url {
            institution.logo_url = logo_url.clone();
        }
        if let Some(primary) = &self.primary_color {
            institution.primary_color = primary.clone();
        }
        if let Some(secondary) = &self.secondary_color {
            institution.secondary_color = secondary.clone();
        }
    }
}

/// Owned by exactly one institution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub institution_id: String,
}

/// Session identity. Not a managed collection: a single current-session
/// value, re-derived at each login and serialized only for session
/// continuity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Absent only for SUPER_ADMIN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,
    /// Present only for DEPT_ADMIN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// One question within a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Unique within its form
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Required and non-empty when `field_type` is `Choice`, ignored otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub required: bool,
}

/// A survey form, always scoped to an institution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub id: String,
    pub institution_id: String,
    /// Absent means institution-wide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    pub title: String,
    pub description: String,
    pub industry: String,
    /// Order is meaningful and user-editable
    pub fields: Vec<FormField>,
    pub created_at: String,
}

impl FormTemplate {
    pub fn field(&self, field_id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == field_id)
    }
}

/// A submitted answer: either free text or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
}

impl AnswerValue {
    /// Whether this answer counts as filled in for a required field
    pub fn is_answered(&self) -> bool {
        match self {
            AnswerValue::Number(_) => true,
            AnswerValue::Text(s) => !s.trim().is_empty(),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(n) => {
                // whole numbers render without a trailing .0, but only
                // within i64 range where the cast cannot saturate;
                // i64::MAX as f64 rounds up to 2^63, so the upper bound
                // stays exclusive
                if n.fract() == 0.0
                    && n.is_finite()
                    && *n >= i64::MIN as f64
                    && *n < i64::MAX as f64
                {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            AnswerValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        AnswerValue::Number(n)
    }
}

/// Immutable once created; the responses collection is append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: String,
    pub form_id: String,
    /// fieldId -> value; only fields present in the form are meaningful keys
    pub answers: HashMap<String, AnswerValue>,
    pub submitted_at: String,
}

/// Actionable advice item inside an analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: RecommendationPriority,
}

/// Shape returned by the AI feedback-analysis collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysisResult {
    pub summary: String,
    /// 0 (negative) to 100 (positive)
    pub sentiment_score: f64,
    pub sentiment_trend: SentimentTrend,
    pub key_themes: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

/// At most one record exists per formId; a new insert replaces the prior one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub form_id: String,
    pub result: AiAnalysisResult,
    pub generated_at: String,
}
