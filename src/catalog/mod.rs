//! Remote execution layer for the data-virtualization catalog.
//!
//! Provides a trait-based interface so the HTTP client can be swapped for
//! mocks in tests and offline demos.

mod http;
mod mock;
mod types;

pub use http::HttpCatalogClient;
pub use mock::{FailingCatalogClient, MockCatalogClient};
pub use types::{display_value, TableData};

use async_trait::async_trait;

/// Outcome of one catalog execution.
///
/// Failures are data, not errors: the catalog boundary never raises, it
/// reports what the upstream said and the caller renders it.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The catalog executed the SQL and returned rows.
    Success(TableData),
    /// The request failed; `status` is the upstream HTTP status, or 500 for
    /// transport-level failures that never produced a response.
    Failure { status: u16, message: String },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Trait defining the interface for catalog execution clients.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Executes `sql` against the catalog, requesting at most `limit` rows.
    ///
    /// Every failure mode comes back as `ExecutionOutcome::Failure`.
    async fn execute(&self, sql: &str, limit: usize) -> ExecutionOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success_flag() {
        let ok = ExecutionOutcome::Success(TableData::default());
        let bad = ExecutionOutcome::Failure {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
