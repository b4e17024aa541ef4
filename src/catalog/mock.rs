//! Mock catalog clients for tests and offline demos.

use super::types::TableData;
use super::{CatalogClient, ExecutionOutcome};
use async_trait::async_trait;
use std::sync::Mutex;

/// A catalog client that returns a canned table and records every call.
pub struct MockCatalogClient {
    table: TableData,
    calls: Mutex<Vec<String>>,
}

impl MockCatalogClient {
    /// Creates a mock returning an empty result set.
    pub fn new() -> Self {
        Self::with_table(TableData::default())
    }

    /// Creates a mock returning the given table for every execution.
    pub fn with_table(table: TableData) -> Self {
        Self {
            table,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// SQL strings received so far, in call order.
    pub fn executed(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl Default for MockCatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn execute(&self, sql: &str, _limit: usize) -> ExecutionOutcome {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(sql.to_string());
        }
        ExecutionOutcome::Success(self.table.clone())
    }
}

/// A catalog client whose every execution fails with a fixed outcome.
pub struct FailingCatalogClient {
    status: u16,
    message: String,
}

impl FailingCatalogClient {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[async_trait]
impl CatalogClient for FailingCatalogClient {
    async fn execute(&self, _sql: &str, _limit: usize) -> ExecutionOutcome {
        ExecutionOutcome::Failure {
            status: self.status,
            message: self.message.clone(),
        }
    }
}
