//! Validation rules applied before mutations
//!
//! Both checks reject before anything is written; a failed validation never
//! leaves a partial write behind.

use std::collections::{HashMap, HashSet};

use crate::entities::{AnswerValue, FormTemplate};
use crate::enums::FieldType;
use crate::error::ValidationError;

/// Validate a form before it is saved.
///
/// A form needs a non-empty title, at least one field, unique field ids,
/// and non-empty options on every choice field.
pub fn validate_form(form: &FormTemplate) -> Result<(), ValidationError> {
    if form.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if form.fields.is_empty() {
        return Err(ValidationError::NoFields);
    }

    let mut seen = HashSet::new();
    for field in &form.fields {
        if !seen.insert(field.id.as_str()) {
            return Err(ValidationError::DuplicateFieldId {
                field_id: field.id.clone(),
            });
        }
        if field.field_type == FieldType::Choice {
            let has_options = field
                .options
                .as_ref()
                .map(|opts| !opts.is_empty())
                .unwrap_or(false);
            if !has_options {
                return Err(ValidationError::MissingOptions {
                    field_id: field.id.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Validate a public submission against its form.
///
/// Every required field must carry a non-empty answer. Answers keyed by
/// unknown field ids are tolerated (the form may have changed since the
/// link was shared) but never satisfy a required field.
pub fn validate_submission(
    form: &FormTemplate,
    answers: &HashMap<String, AnswerValue>,
) -> Result<(), ValidationError> {
    for field in &form.fields {
        if !field.required {
            continue;
        }
        let answered = answers
            .get(&field.id)
            .map(AnswerValue::is_answered)
            .unwrap_or(false);
        if !answered {
            return Err(ValidationError::MissingRequired {
                label: field.label.clone(),
            });
        }
    }
    Ok(())
}
