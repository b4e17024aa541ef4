//! HTTP client for the question-answering service.

use super::types::AnswerReply;
use super::AnswerClient;
use crate::config::{AnswerConfig, Credentials};
use crate::error::{Result, VouchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Asks questions over HTTP. One POST per question, no retries; generation
/// takes long enough that the analyst decides about repeats, not the client.
pub struct HttpAnswerClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    mode: &'a str,
    verbose: bool,
}

impl HttpAnswerClient {
    /// Creates a client from answer-service settings and shared credentials.
    pub fn new(config: &AnswerConfig, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VouchError::answer(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            username: credentials.username().to_string(),
            password: credentials.password().to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/answerDataQuestion", self.base_url)
    }
}

#[async_trait]
impl AnswerClient for HttpAnswerClient {
    async fn ask(&self, question: &str) -> Result<AnswerReply> {
        let url = self.endpoint();
        debug!(url = %url, question, "asking the answer service");

        let request = AskRequest {
            question,
            mode: "data",
            verbose: true,
        };

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VouchError::answer("Answer service timed out.")
                } else if e.is_connect() {
                    VouchError::answer(format!(
                        "Failed to connect to the answer service at {}. Is it running?",
                        self.base_url
                    ))
                } else {
                    VouchError::answer(format!("Answer request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VouchError::answer(format!("Failed to read answer response: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "answer service returned error status");
            return Err(VouchError::answer(format!(
                "Answer service returned HTTP {}",
                status.as_u16()
            )));
        }

        serde_json::from_str::<AnswerReply>(&body).map_err(|e| {
            debug!(raw = %body, "unparseable answer payload");
            VouchError::answer(format!("Could not parse answer response: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = AnswerConfig {
            url: "http://localhost:8008/".to_string(),
            timeout_secs: 5,
        };
        let client = HttpAnswerClient::new(&config, &Credentials::default()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8008/answerDataQuestion");
    }

    #[test]
    fn test_request_body_shape() {
        let request = AskRequest {
            question: "how many orders",
            mode: "data",
            verbose: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["question"], "how many orders");
        assert_eq!(json["mode"], "data");
        assert_eq!(json["verbose"], true);
    }
}
