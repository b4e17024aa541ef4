//! HTTP client for the catalog's query execution endpoint.

use super::types::{normalize, ExecuteResponse, TableData};
use super::{CatalogClient, ExecutionOutcome};
use crate::config::{CatalogConfig, Credentials};
use crate::error::{Result, VouchError};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// How much upstream body to quote in a failure message.
const ERROR_BODY_PREVIEW: usize = 200;

/// Executes SQL against the catalog over HTTP.
///
/// One POST per execution, no retries. Failures come back as structured
/// outcomes rather than errors so the feed can show the status line.
pub struct HttpCatalogClient {
    client: Client,
    url: String,
    server_id: u32,
    auth_header: String,
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    vql: &'a str,
    limit: usize,
}

impl HttpCatalogClient {
    /// Creates a client from catalog settings and shared credentials.
    pub fn new(config: &CatalogConfig, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| VouchError::catalog(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            server_id: config.server_id,
            auth_header: basic_auth_header(credentials.username(), credentials.password()),
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn execute(&self, sql: &str, limit: usize) -> ExecutionOutcome {
        let request = ExecuteRequest { vql: sql, limit };
        debug!(url = %self.url, server_id = self.server_id, limit, "executing SQL against catalog");

        let result = self
            .client
            .post(&self.url)
            .query(&[("serverId", self.server_id)])
            .header("Authorization", &self.auth_header)
            .json(&request)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "catalog request never reached the endpoint");
                return ExecutionOutcome::Failure {
                    status: 500,
                    message: transport_message(&e),
                };
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return ExecutionOutcome::Failure {
                    status: status.as_u16(),
                    message: format!("Failed to read catalog response: {e}"),
                };
            }
        };

        if !status.is_success() {
            warn!(status = status.as_u16(), "catalog returned error status");
            return ExecutionOutcome::Failure {
                status: status.as_u16(),
                message: status_message(status.as_u16(), &body),
            };
        }

        match parse_success_body(&body) {
            Ok(table) => ExecutionOutcome::Success(table),
            Err(message) => {
                debug!(raw = %body, "unparseable catalog payload");
                ExecutionOutcome::Failure {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}

fn basic_auth_header(username: &str, password: &str) -> String {
    let token = BASE64.encode(format!("{username}:{password}"));
    format!("Basic {token}")
}

fn transport_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Catalog request timed out.".to_string()
    } else if error.is_connect() {
        "Failed to connect to the catalog. Check the endpoint and your network.".to_string()
    } else {
        format!("Catalog request failed: {error}")
    }
}

fn status_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("Catalog returned HTTP {status}");
    }

    let preview: String = trimmed.chars().take(ERROR_BODY_PREVIEW).collect();
    if preview.len() < trimmed.len() {
        format!("Catalog returned HTTP {status}: {preview}…")
    } else {
        format!("Catalog returned HTTP {status}: {preview}")
    }
}

fn parse_success_body(body: &str) -> std::result::Result<TableData, String> {
    serde_json::from_str::<ExecuteResponse>(body)
        .map(normalize)
        .map_err(|e| format!("Could not parse catalog response: {e}"))
}
