//! AI client implementations

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

use insightflow_config::AiConfig;
use insightflow_core::{AiAnalysisResult, AnswerValue, FormTemplate};

use crate::error::{AiError, AiResult};
use crate::prompts;
use crate::types::{validate_analysis, GeneratedForm};

/// Boundary trait for the two AI collaborators
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Generate a partial form template from a free-text goal description
    async fn generate_form(&self, goal: &str) -> AiResult<GeneratedForm>;

    /// Analyze a form's responses. Callers truncate `answers` to the
    /// configured maximum before invoking; the client sends what it gets.
    async fn analyze_feedback(
        &self,
        form: &FormTemplate,
        answers: &[HashMap<String, AnswerValue>],
    ) -> AiResult<AiAnalysisResult>;
}

/// HTTP client against an OpenAI-compatible chat-completions endpoint
pub struct HttpAiClient {
    http: reqwest::Client,
    config: AiConfig,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl HttpAiClient {
    /// Create a client from configuration
    pub fn new(config: AiConfig) -> AiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Run one JSON-mode completion and parse the content into `T`
    async fn complete<T: serde::de::DeserializeOwned>(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> AiResult<T> {
        let api_key = self.config.api_key.as_ref().ok_or(AiError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        debug!("AI request to {} with model {}", url, model);
        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&json!({
                "model": model,
                "messages": [
                    {"role": "system", "content": system},
                    {"role": "user", "content": user},
                ],
                "response_format": {"type": "json_object"},
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let mut message = body.trim().to_string();
            message.truncate(500);
            return Err(AiError::service(status.as_u16(), message));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::invalid_response(format!("bad completion envelope: {}", e)))?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| AiError::invalid_response("no content in completion"))?;

        serde_json::from_str(content)
            .map_err(|e| AiError::invalid_response(format!("content does not match contract: {}", e)))
    }
}

#[async_trait]
impl AiClient for HttpAiClient {
    async fn generate_form(&self, goal: &str) -> AiResult<GeneratedForm> {
        info!("Generating form for goal: {}", goal);
        self.complete(
            &self.config.generation_model,
            prompts::GENERATION_SYSTEM,
            &prompts::generation_prompt(goal),
        )
        .await
    }

    async fn analyze_feedback(
        &self,
        form: &FormTemplate,
        answers: &[HashMap<String, AnswerValue>],
    ) -> AiResult<AiAnalysisResult> {
        info!(
            "Analyzing {} responses for form '{}'",
            answers.len(),
            form.id
        );
        let result: AiAnalysisResult = self
            .complete(
                &self.config.analysis_model,
                prompts::ANALYSIS_SYSTEM,
                &prompts::analysis_prompt(form, answers),
            )
            .await?;
        validate_analysis(&result)?;
        Ok(result)
    }
}

/// Canned-response client for tests and offline runs
#[derive(Default)]
pub struct MockAiClient {
    form: Mutex<Option<GeneratedForm>>,
    analysis: Mutex<Option<AiAnalysisResult>>,
    failure: Mutex<Option<String>>,
    /// Number of calls observed, for asserting call counts in tests
    calls: Mutex<usize>,
}

impl MockAiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `generate_form` with this template
    pub fn with_form(self, form: GeneratedForm) -> Self {
        *self.form.lock().expect("mock lock") = Some(form);
        self
    }

    /// Respond to `analyze_feedback` with this result
    pub fn with_analysis(self, analysis: AiAnalysisResult) -> Self {
        *self.analysis.lock().expect("mock lock") = Some(analysis);
        self
    }

    /// Fail every call with this message
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.failure.lock().expect("mock lock") = Some(message.into());
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().expect("mock lock")
    }

    fn record_call(&self) -> AiResult<()> {
        *self.calls.lock().expect("mock lock") += 1;
        if let Some(message) = self.failure.lock().expect("mock lock").clone() {
            return Err(AiError::service(503, message));
        }
        Ok(())
    }
}

#[async_trait]
impl AiClient for MockAiClient {
    async fn generate_form(&self, _goal: &str) -> AiResult<GeneratedForm> {
        self.record_call()?;
        self.form
            .lock()
            .expect("mock lock")
            .clone()
            .ok_or_else(|| AiError::invalid_response("mock has no form configured"))
    }

    async fn analyze_feedback(
        &self,
        _form: &FormTemplate,
        _answers: &[HashMap<String, AnswerValue>],
    ) -> AiResult<AiAnalysisResult> {
        self.record_call()?;
        self.analysis
            .lock()
            .expect("mock lock")
            .clone()
            .ok_or_else(|| AiError::invalid_response("mock has no analysis configured"))
    }
}
