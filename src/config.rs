//! Configuration management for Vouch.
//!
//! Handles loading configuration from TOML files and environment variables:
//! endpoints for the answer service and the catalog, oracle settings, and the
//! verified-query store location.

use crate::error::{Result, VouchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use url::Url;

/// Main configuration structure for Vouch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Analyst name recorded as `verified_by` on saved queries.
    #[serde(default = "default_analyst")]
    pub analyst: String,

    /// Basic-auth credentials shared by the answer service and the catalog.
    #[serde(default)]
    pub credentials: Credentials,

    /// Answer service configuration.
    #[serde(default)]
    pub answer: AnswerConfig,

    /// Catalog execution endpoint configuration.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Oracle (language model) configuration.
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Verified-query store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_analyst() -> String {
    "data_analyst".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analyst: default_analyst(),
            credentials: Credentials::default(),
            answer: AnswerConfig::default(),
            catalog: CatalogConfig::default(),
            oracle: OracleConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Basic-auth credentials for the answer service and the catalog.
///
/// Both upstream services authenticate the same analyst account, so one pair
/// covers both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Credentials {
    /// Username (not recommended to store in config; prefer VOUCH_USERNAME).
    pub username: Option<String>,

    /// Password (not recommended to store in config; prefer VOUCH_PASSWORD).
    pub password: Option<String>,
}

impl Credentials {
    /// Applies environment variables (VOUCH_USERNAME, VOUCH_PASSWORD) as defaults.
    pub fn apply_env_defaults(&mut self) {
        if self.username.is_none() {
            self.username = std::env::var("VOUCH_USERNAME").ok();
        }
        if self.password.is_none() {
            self.password = std::env::var("VOUCH_PASSWORD").ok();
        }
    }

    /// Effective username, falling back to the stock lab account.
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or("admin")
    }

    /// Effective password, falling back to the stock lab account.
    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or("admin")
    }
}

/// Answer service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Base URL of the question-answering service.
    #[serde(default = "default_answer_url")]
    pub url: String,

    /// Request timeout in seconds. Generated answers can take a while.
    #[serde(default = "default_answer_timeout")]
    pub timeout_secs: u64,
}

fn default_answer_url() -> String {
    "http://localhost:8008".to_string()
}

fn default_answer_timeout() -> u64 {
    120
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            url: default_answer_url(),
            timeout_secs: default_answer_timeout(),
        }
    }
}

/// Catalog execution endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Full URL of the catalog's query execution endpoint.
    #[serde(default = "default_catalog_url")]
    pub url: String,

    /// Catalog server id, sent as the `serverId` query parameter.
    #[serde(default = "default_server_id")]
    pub server_id: u32,

    /// Maximum number of rows requested per execution.
    #[serde(default = "default_row_limit")]
    pub row_limit: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,

    /// Verify TLS certificates. Lab catalogs often run on self-signed certs.
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

fn default_catalog_url() -> String {
    "http://localhost:9090/denodo-data-catalog/public/api/askaquestion/execute".to_string()
}

fn default_server_id() -> u32 {
    1
}

fn default_row_limit() -> usize {
    100
}

fn default_catalog_timeout() -> u64 {
    60
}

fn default_verify_ssl() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            server_id: default_server_id(),
            row_limit: default_row_limit(),
            timeout_secs: default_catalog_timeout(),
            verify_ssl: default_verify_ssl(),
        }
    }
}

/// Oracle (language model) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Oracle provider: "openai", "mock" or "none".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name (e.g., "gpt-5").
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-5".to_string()
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
        }
    }
}

/// Verified-query store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the YAML file holding verified queries.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("verified_queries.yaml")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Config {
    /// Platform config directory plus `sql-vouch/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sql-vouch")
            .join("config.toml")
    }

    /// Loads the config file, falling back to defaults when it is missing.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| VouchError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            VouchError::config(format!("Could not parse {}:\n  {}", path.display(), e))
        })
    }

    /// Checks that both endpoint URLs parse.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.answer.url)
            .map_err(|e| VouchError::config(format!("Invalid answer URL '{}': {e}", self.answer.url)))?;
        Url::parse(&self.catalog.url).map_err(|e| {
            VouchError::config(format!("Invalid catalog URL '{}': {e}", self.catalog.url))
        })?;
        Ok(())
    }

    /// Returns a display-safe summary of the answer endpoint (no credentials).
    pub fn answer_display(&self) -> String {
        host_display(&self.answer.url)
    }

    /// Returns a display-safe summary of the catalog endpoint (no credentials).
    pub fn catalog_display(&self) -> String {
        host_display(&self.catalog.url)
    }
}

fn host_display(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("unknown");
            match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            }
        }
        Err(_) => url.to_string(),
    }
}
