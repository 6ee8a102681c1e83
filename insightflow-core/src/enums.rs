//! Enumerations shared across the domain model
//!
//! Serde representations match the persisted snapshot layout, so renames
//! here are wire-format changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of question a form field asks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text answer
    Text,
    /// Numeric satisfaction rating
    Rating,
    /// One option out of a fixed list; `options` must be non-empty
    Choice,
    /// Yes/no answer
    YesNo,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::Text => "text",
            FieldType::Rating => "rating",
            FieldType::Choice => "choice",
            FieldType::YesNo => "yesno",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "rating" => Ok(FieldType::Rating),
            "choice" => Ok(FieldType::Choice),
            "yesno" => Ok(FieldType::YesNo),
            _ => Err(format!("Invalid field type: {}", s)),
        }
    }
}

/// Role carried by a session user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Platform operator; sees every tenant
    SuperAdmin,
    /// Administers a single institution
    InstitutionAdmin,
    /// Administers a single department within an institution
    DeptAdmin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::InstitutionAdmin => "INSTITUTION_ADMIN",
            UserRole::DeptAdmin => "DEPT_ADMIN",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SUPER_ADMIN" => Ok(UserRole::SuperAdmin),
            "INSTITUTION_ADMIN" => Ok(UserRole::InstitutionAdmin),
            "DEPT_ADMIN" => Ok(UserRole::DeptAdmin),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Overall sentiment direction of an analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentTrend {
    Positive,
    Neutral,
    Negative,
}

/// Priority attached to an AI recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}
