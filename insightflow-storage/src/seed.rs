//! Seed data used when a collection has never been persisted

use insightflow_core::{FieldType, FormField, FormTemplate, Institution};

/// Id of the default tenant every non-super login falls back to
pub const DEFAULT_INSTITUTION_ID: &str = "inst-1";

/// Default institution present on first start
pub fn default_institutions() -> Vec<Institution> {
    vec![Institution {
        id: DEFAULT_INSTITUTION_ID.to_string(),
        name: "Grand Azure Hotels".to_string(),
        logo_url: "https://cdn-icons-png.flaticon.com/512/201/201623.png".to_string(),
        primary_color: "#0f766e".to_string(),
        secondary_color: "#f0fdfa".to_string(),
        created_at: insightflow_core::now_iso(),
    }]
}

/// Demo survey present on first start
pub fn default_forms() -> Vec<FormTemplate> {
    vec![FormTemplate {
        id: "form-1".to_string(),
        institution_id: DEFAULT_INSTITUTION_ID.to_string(),
        department_id: None,
        title: "Guest Experience Survey".to_string(),
        description: "Tell us about your stay at Grand Azure.".to_string(),
        industry: "Hospitality".to_string(),
        created_at: insightflow_core::now_iso(),
        fields: vec![
            FormField {
                id: "cleanliness".to_string(),
                label: "Room Cleanliness".to_string(),
                field_type: FieldType::Rating,
                options: None,
                required: true,
            },
            FormField {
                id: "staff".to_string(),
                label: "Staff Friendliness".to_string(),
                field_type: FieldType::Rating,
                options: None,
                required: true,
            },
            FormField {
                id: "checkin".to_string(),
                label: "Check-in Speed".to_string(),
                field_type: FieldType::Rating,
                options: None,
                required: true,
            },
            FormField {
                id: "comments".to_string(),
                label: "Comments".to_string(),
                field_type: FieldType::Text,
                options: None,
                required: false,
            },
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use insightflow_core::validation::validate_form;

    #[test]
    fn test_seed_form_is_valid() {
        for form in default_forms() {
            assert!(validate_form(&form).is_ok());
            assert_eq!(form.institution_id, DEFAULT_INSTITUTION_ID);
        }
    }

    #[test]
    fn test_seed_institution_matches_default_tenant() {
        let insts = default_institutions();
        assert_eq!(insts.len(), 1);
        assert_eq!(insts[0].id, DEFAULT_INSTITUTION_ID);
    }
}
