//! Error types for Vouch.

use thiserror::Error;

/// Main error type for Vouch operations.
///
/// Each variant maps to one upstream dependency, so feed output and logs can
/// say which side of the system failed.
#[derive(Error, Debug)]
pub enum VouchError {
    /// The answer service could not be reached or replied unusably.
    #[error("Answer service error: {0}")]
    Answer(String),

    /// The catalog request failed before a structured outcome existed.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// The matching oracle failed or produced an unusable reply.
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// The verified query store could not be read or written.
    #[error("Store error: {0}")]
    Store(String),

    /// Bad configuration file, endpoint URL or credentials.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected states that should not occur in normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VouchError {
    pub fn answer(msg: impl Into<String>) -> Self {
        Self::Answer(msg.into())
    }

    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    pub fn oracle(msg: impl Into<String>) -> Self {
        Self::Oracle(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short category label for log lines and the error feed.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Answer(_) => "Answer Service Error",
            Self::Catalog(_) => "Catalog Error",
            Self::Oracle(_) => "Oracle Error",
            Self::Store(_) => "Store Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using VouchError.
pub type Result<T> = std::result::Result<T, VouchError>;
