//! Read-only CSV export projection
//!
//! One row per response, one column per field in form order, plus a
//! trailing submission-timestamp column. Rows are sorted ascending by
//! `submittedAt` (stable), so exports are chronological regardless of the
//! newest-first insertion order of the in-memory collection.

use crate::entities::{FormResponse, FormTemplate};
use crate::error::{CoreError, CoreResult};

/// Column header used for the submission timestamp
pub const SUBMITTED_AT_HEADER: &str = "Submitted At";

/// Project a form and its responses into CSV text.
///
/// Pure derivation over current state; nothing is stored. Answers for
/// fields absent from a response render as empty cells.
pub fn export_responses_csv(
    form: &FormTemplate,
    responses: &[FormResponse],
) -> CoreResult<String> {
    let mut ordered: Vec<&FormResponse> = responses.iter().collect();
    ordered.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));

    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut headers: Vec<String> = form.fields.iter().map(|f| f.label.clone()).collect();
    headers.push(SUBMITTED_AT_HEADER.to_string());
    wtr.write_record(&headers)?;

    for response in ordered {
        let mut row: Vec<String> = form
            .fields
            .iter()
            .map(|field| {
                response
                    .answers
                    .get(&field.id)
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            })
            .collect();
        row.push(response.submitted_at.clone());
        wtr.write_record(&row)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| CoreError::Export(e.into_error().into()))?;
    // csv::Writer only ever emits valid UTF-8 for UTF-8 input
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AnswerValue, FormField};
    use crate::enums::FieldType;
    use std::collections::HashMap;

    fn form() -> FormTemplate {
        FormTemplate {
            id: "form-1".to_string(),
            institution_id: "inst-1".to_string(),
            department_id: None,
            title: "Guest Experience Survey".to_string(),
            description: String::new(),
            industry: "Hospitality".to_string(),
            fields: vec![
                FormField {
                    id: "cleanliness".to_string(),
                    label: "Room Cleanliness".to_string(),
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
            created_at: crate::now_iso(),
        }
    }

    fn response(id: &str, submitted_at: &str, rating: f64, comment: Option<&str>) -> FormResponse {
        let mut answers = HashMap::new();
        answers.insert("cleanliness".to_string(), AnswerValue::Number(rating));
        if let Some(c) = comment {
            answers.insert("comments".to_string(), AnswerValue::Text(c.to_string()));
        }
        FormResponse {
            id: id.to_string(),
            form_id: "form-1".to_string(),
            answers,
            submitted_at: submitted_at.to_string(),
        }
    }

    #[test]
    fn test_export_header_follows_field_order() {
        let csv = export_responses_csv(&form(), &[]).unwrap();
        assert_eq!(
            csv.trim_end(),
            "Room Cleanliness,Comments,Submitted At"
        );
    }

    #[test]
    fn test_export_rows_sorted_by_submission_time() {
        // in-memory order is newest-first; export must be chronological
        let responses = vec![
            response("r-2", "2025-02-01T10:00:00Z", 5.0, Some("great")),
            response("r-1", "2025-01-01T10:00:00Z", 3.0, None),
        ];
        let csv = export_responses_csv(&form(), &responses).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "3,,2025-01-01T10:00:00Z");
        assert_eq!(lines[2], "5,great,2025-02-01T10:00:00Z");
    }

    #[test]
    fn test_export_ignores_answers_for_unknown_fields() {
        let mut r = response("r-1", "2025-01-01T10:00:00Z", 4.0, None);
        r.answers
            .insert("removed-field".to_string(), AnswerValue::Text("x".into()));
        let csv = export_responses_csv(&form(), &[r]).unwrap();
        assert!(!csv.contains("removed-field"));
        assert!(csv.lines().nth(1).unwrap().starts_with("4,,"));
    }
}
