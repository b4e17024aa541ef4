//! Command-line argument parsing for Vouch.
//!
//! CLI flags override values from the config file; nothing here opens a
//! programmatic query interface, the binary always runs the TUI.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Which dashboard the session starts in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dashboard {
    /// Match questions against verified queries before falling back to the
    /// answer service.
    #[default]
    Assistant,
    /// Send questions straight to the answer service and curate the SQL.
    Validator,
}

impl Dashboard {
    /// Human-readable name shown in the header bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Assistant => "assistant",
            Self::Validator => "validator",
        }
    }
}

impl std::str::FromStr for Dashboard {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assistant" => Ok(Self::Assistant),
            "validator" => Ok(Self::Validator),
            _ => Err(format!(
                "Invalid dashboard: {s}. Expected: assistant or validator"
            )),
        }
    }
}

impl std::fmt::Display for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A terminal workbench for AI-assisted SQL with analyst-verified queries.
#[derive(Parser, Debug)]
#[command(name = "vouch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Dashboard to start in (assistant or validator)
    #[arg(long, value_name = "DASHBOARD", default_value = "assistant")]
    pub dashboard: Dashboard,

    /// Path to the TOML config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the question-answering service
    #[arg(long, value_name = "URL")]
    pub answer_url: Option<String>,

    /// Full URL of the catalog execution endpoint
    #[arg(long, value_name = "URL")]
    pub catalog_url: Option<String>,

    /// Catalog server id (serverId query parameter)
    #[arg(long, value_name = "ID")]
    pub server_id: Option<u32>,

    /// Path to the verified-query YAML file
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Analyst name recorded on saved queries
    #[arg(long, value_name = "NAME", env = "VOUCH_ANALYST")]
    pub analyst: Option<String>,

    /// Oracle provider to use (openai, mock, or none; overrides config)
    #[arg(long, value_name = "PROVIDER")]
    pub oracle: Option<String>,

    /// Wire every upstream client to an in-process mock (offline demo)
    #[arg(long)]
    pub mock: bool,

    /// Log filter (overrides RUST_LOG, e.g. "sql_vouch=debug")
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The config file to load: `--config` when given, the default otherwise.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Applies CLI overrides on top of a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.answer_url {
            config.answer.url = url.clone();
        }
        if let Some(url) = &self.catalog_url {
            config.catalog.url = url.clone();
        }
        if let Some(id) = self.server_id {
            config.catalog.server_id = id;
        }
        if let Some(path) = &self.store {
            config.store.path = path.clone();
        }
        if let Some(analyst) = &self.analyst {
            config.analyst = analyst.clone();
        }
        if let Some(provider) = &self.oracle {
            config.oracle.provider = provider.clone();
        }
        if self.mock {
            config.oracle.provider = "mock".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn test_default_dashboard() {
        let cli = parse_args(&["vouch"]);
        assert_eq!(cli.dashboard, Dashboard::Assistant);
    }

    #[test]
    fn test_parse_dashboard() {
        let cli = parse_args(&["vouch", "--dashboard", "validator"]);
        assert_eq!(cli.dashboard, Dashboard::Validator);
    }

    #[test]
    fn test_dashboard_from_str_rejects_unknown() {
        let result = "builder".parse::<Dashboard>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid dashboard"));
    }

    #[test]
    fn test_dashboard_display() {
        assert_eq!(Dashboard::Assistant.to_string(), "assistant");
        assert_eq!(Dashboard::Validator.to_string(), "validator");
    }

    #[test]
    fn test_parse_config_path() {
        let cli = parse_args(&["vouch", "--config", "/path/to/config.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_parse_endpoint_overrides() {
        let cli = parse_args(&[
            "vouch",
            "--answer-url",
            "http://sdk.internal:8008",
            "--catalog-url",
            "http://catalog.internal:9090/execute",
            "--server-id",
            "3",
        ]);

        assert_eq!(cli.answer_url, Some("http://sdk.internal:8008".to_string()));
        assert_eq!(
            cli.catalog_url,
            Some("http://catalog.internal:9090/execute".to_string())
        );
        assert_eq!(cli.server_id, Some(3));
    }

    #[test]
    fn test_apply_to_overrides_config() {
        let cli = parse_args(&[
            "vouch",
            "--answer-url",
            "http://sdk.internal:8008",
            "--store",
            "team.yaml",
            "--analyst",
            "rivera",
            "--oracle",
            "none",
        ]);

        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(config.answer.url, "http://sdk.internal:8008");
        assert_eq!(config.store.path, PathBuf::from("team.yaml"));
        assert_eq!(config.analyst, "rivera");
        assert_eq!(config.oracle.provider, "none");
        // Untouched fields keep their defaults
        assert_eq!(config.catalog.server_id, 1);
    }

    #[test]
    fn test_apply_to_leaves_config_alone_without_flags() {
        let cli = parse_args(&["vouch"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(config.answer.url, "http://localhost:8008");
        assert_eq!(config.analyst, "data_analyst");
    }

    #[test]
    fn test_mock_flag_forces_mock_oracle() {
        let cli = parse_args(&["vouch", "--mock"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert!(cli.mock);
        assert_eq!(config.oracle.provider, "mock");
    }
}
