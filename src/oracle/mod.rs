//! Oracle integration for Vouch.
//!
//! The oracle is the external language model consulted for two judgment
//! calls: whether a verified query answers a new question, and how to rewrite
//! verified SQL when it almost does. Implementations sit behind a trait so
//! tests and offline runs can swap in a mock.

mod adjuster;
mod matcher;
mod mock;
mod openai;
mod parser;
mod prompt;

pub use adjuster::SqlAdjuster;
pub use matcher::{QueryMatch, QueryMatcher};
pub use mock::MockOracle;
pub use openai::{OpenAiOracle, OpenAiOracleConfig};
pub use parser::unwrap_reply;

use crate::error::Result;
use async_trait::async_trait;
use std::str::FromStr;

/// Trait for oracle clients that can generate completions.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Generates one completion for the given prompt.
    ///
    /// A single attempt; callers surface failures and fall back to safe
    /// defaults instead of retrying.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Oracle provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleProvider {
    /// OpenAI chat completions.
    #[default]
    OpenAi,
    /// Mock oracle for tests and offline demos (no API key required).
    Mock,
    /// No oracle: matching and adjustment are skipped entirely.
    None,
}

impl OracleProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Mock => "mock",
            Self::None => "none",
        }
    }
}

impl FromStr for OracleProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "mock" => Ok(Self::Mock),
            "none" | "off" => Ok(Self::None),
            _ => Err(format!("Unknown oracle provider: {s}")),
        }
    }
}

impl std::fmt::Display for OracleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
