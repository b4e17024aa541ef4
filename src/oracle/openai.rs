//! OpenAI oracle implementation.

use super::Oracle;
use crate::error::{Result, VouchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI chat completions endpoint.
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Configuration for the OpenAI oracle.
#[derive(Debug, Clone)]
pub struct OpenAiOracleConfig {
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl OpenAiOracleConfig {
    /// Creates a new configuration with default timeout.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets a custom timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Oracle backed by the OpenAI chat completions API.
///
/// Completions run at temperature 0 so the matcher's JSON verdicts stay as
/// stable as the model allows.
pub struct OpenAiOracle {
    config: OpenAiOracleConfig,
    client: Client,
}

impl OpenAiOracle {
    /// Creates a new OpenAI oracle with the given configuration.
    pub fn new(config: OpenAiOracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VouchError::oracle(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Creates an oracle from environment variables.
    ///
    /// Reads `OPENAI_API_KEY` for the API key and optionally `OPENAI_MODEL`
    /// for the model, falling back to `default_model`.
    pub fn from_env(default_model: &str) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| VouchError::oracle("OPENAI_API_KEY environment variable not set"))?;

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| default_model.to_string());

        Self::new(OpenAiOracleConfig::new(api_key, model))
    }

    /// Parses an API error response into a user-facing error.
    fn parse_error(status: reqwest::StatusCode, body: &str) -> VouchError {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return VouchError::oracle("OpenAI rejected the API key. Check OPENAI_API_KEY.");
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return VouchError::oracle("Rate limited. Wait a moment and repeat the action.");
        }

        if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(body) {
            return VouchError::oracle(format!("OpenAI API error: {}", error_response.error.message));
        }

        VouchError::oracle(format!("OpenAI API error ({status}): {body}"))
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ApiRequest {
            model: self.config.model.clone(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.0,
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "oracle completion request");

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VouchError::oracle("Oracle request timed out.")
                } else if e.is_connect() {
                    VouchError::oracle("Failed to connect to the OpenAI API. Check your network.")
                } else {
                    VouchError::oracle(format!("Oracle request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VouchError::oracle(format!("Failed to read oracle response: {e}")))?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }

        let parsed: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| VouchError::oracle(format!("Failed to parse oracle response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| VouchError::oracle("Oracle returned no completion"))
    }
}

#[derive(Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}
