//! AI collaborator configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// AI client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Base URL of an OpenAI-compatible chat-completions endpoint
    pub base_url: String,

    /// API key; usually supplied via INSIGHTFLOW_AI_API_KEY
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used for form generation (creative text)
    pub generation_model: String,

    /// Model used for feedback analysis (complex reasoning)
    pub analysis_model: String,

    /// Per-request timeout
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub timeout: Duration,

    /// Upper bound on the number of response answer-sets sent for analysis
    pub max_context_responses: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            generation_model: "gpt-4o-mini".to_string(),
            analysis_model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(60),
            max_context_responses: 50,
        }
    }
}

impl Validatable for AiConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.base_url, "base_url", self.domain_name())?;
        validate_required_string(&self.generation_model, "generation_model", self.domain_name())?;
        validate_required_string(&self.analysis_model, "analysis_model", self.domain_name())?;

        if self.timeout.as_secs() == 0 {
            return Err(self.validation_error("timeout must be greater than 0"));
        }
        if self.max_context_responses == 0 {
            return Err(self.validation_error("max_context_responses must be greater than 0"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "ai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.max_context_responses, 50);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ai_config_validation() {
        let mut config = AiConfig::default();
        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config = AiConfig::default();
        config.max_context_responses = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_serializes_as_seconds() {
        let config = AiConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("timeout: 60"));
    }
}
