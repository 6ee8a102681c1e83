//! Prompt construction for the AI collaborators

use insightflow_core::{AnswerValue, FormTemplate};
use std::collections::HashMap;

/// System role for form generation
pub const GENERATION_SYSTEM: &str = "You are an expert survey designer for large institutions. \
Respond with a single JSON object with keys: title (string), description (string), \
industry (string), fields (array of objects with id, label, \
type in ['text','rating','choice','yesno'], optional options (array of strings, \
required for choice), optional required (boolean)). No prose outside the JSON.";

/// System role for feedback analysis
pub const ANALYSIS_SYSTEM: &str = "You are a senior business analyst specializing in \
institutional improvement. Respond with a single JSON object with keys: summary (string), \
sentimentScore (number 0-100), sentimentTrend ('positive'|'neutral'|'negative'), \
keyThemes (array of strings), recommendations (array of objects with title, description, \
priority in ['High','Medium','Low']). No prose outside the JSON.";

/// User prompt for form generation
pub fn generation_prompt(goal: &str) -> String {
    format!(
        "Create a professional feedback form based on this request: \"{}\". \
Ensure questions are relevant and actionable. Use 'rating' for satisfaction questions.",
        goal
    )
}

/// User prompt for feedback analysis. `answers` must already be truncated
/// by the caller; this function serializes whatever it receives.
pub fn analysis_prompt(form: &FormTemplate, answers: &[HashMap<String, AnswerValue>]) -> String {
    let data = serde_json::to_string(answers).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Analyze the following survey responses.\n\
Form Title: {}. Industry: {}.\n\n\
Responses Data:\n{}\n\n\
Provide a deep analysis with a focus on actionable management decisions.",
        form.title, form.industry, data
    )
}
