//! Shapes exchanged with the AI collaborators

use serde::{Deserialize, Serialize};

use insightflow_core::{
    fresh_id, now_iso, AiAnalysisResult, FieldType, FormField, FormTemplate,
};

use crate::error::{AiError, AiResult};

/// Partial form template as produced by the generation collaborator.
/// Missing id/createdAt/tenant scoping are filled in by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub industry: String,
    pub fields: Vec<GeneratedField>,
}

/// One field of a generated form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub required: bool,
}

impl GeneratedForm {
    /// Materialize the partial template into a full form scoped to the
    /// given institution
    pub fn into_template(
        self,
        institution_id: String,
        department_id: Option<String>,
    ) -> FormTemplate {
        FormTemplate {
            id: fresh_id("form"),
            institution_id,
            department_id,
            title: self.title,
            description: self.description,
            industry: self.industry,
            created_at: now_iso(),
            fields: self
                .fields
                .into_iter()
                .map(|f| FormField {
                    id: f.id,
                    label: f.label,
                    field_type: f.field_type,
                    options: f.options,
                    required: f.required,
                })
                .collect(),
        }
    }
}

/// Validate an analysis result against the contract shape constraints
pub fn validate_analysis(result: &AiAnalysisResult) -> AiResult<()> {
    if result.summary.trim().is_empty() {
        return Err(AiError::invalid_response("summary is empty"));
    }
    if !(0.0..=100.0).contains(&result.sentiment_score) {
        return Err(AiError::invalid_response(format!(
            "sentimentScore {} is outside [0, 100]",
            result.sentiment_score
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insightflow_core::SentimentTrend;

    #[test]
    fn test_generated_form_parses_contract_shape() {
        let json = r#"{
            "title": "Course Feedback",
            "description": "Tell us about the course.",
            "industry": "Education",
            "fields": [
                {"id": "pace", "label": "Course pace", "type": "rating", "required": true},
                {"id": "format", "label": "Preferred format", "type": "choice",
                 "options": ["In person", "Online"]}
            ]
        }"#;
        let form: GeneratedForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.fields.len(), 2);
        assert_eq!(form.fields[0].field_type, FieldType::Rating);
        assert!(!form.fields[1].required);
    }

    #[test]
    fn test_wrong_shape_is_a_hard_failure() {
        // missing title entirely
        let json = r#"{"description": "x", "fields": []}"#;
        assert!(serde_json::from_str::<GeneratedForm>(json).is_err());

        // field type outside the enum
        let json = r#"{"title": "t", "description": "d",
                       "fields": [{"id": "a", "label": "A", "type": "slider"}]}"#;
        assert!(serde_json::from_str::<GeneratedForm>(json).is_err());
    }

    #[test]
    fn test_into_template_fills_id_timestamp_and_tenant() {
        let form = GeneratedForm {
            title: "T".to_string(),
            description: "D".to_string(),
            industry: "Education".to_string(),
            fields: vec![GeneratedField {
                id: "q1".to_string(),
                label: "Q1".to_string(),
                field_type: FieldType::Text,
                options: None,
                required: false,
            }],
        };
        let template = form.into_template("inst-1".to_string(), None);
        assert!(template.id.starts_with("form-"));
        assert_eq!(template.institution_id, "inst-1");
        assert!(!template.created_at.is_empty());
    }

    #[test]
    fn test_validate_analysis_bounds() {
        let mut result = AiAnalysisResult {
            summary: "Guests are happy".to_string(),
            sentiment_score: 82.0,
            sentiment_trend: SentimentTrend::Positive,
            key_themes: vec![],
            recommendations: vec![],
        };
        assert!(validate_analysis(&result).is_ok());

        result.sentiment_score = 120.0;
        assert!(validate_analysis(&result).is_err());

        result.sentiment_score = 50.0;
        result.summary = "  ".to_string();
        assert!(validate_analysis(&result).is_err());
    }
}
