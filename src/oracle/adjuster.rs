//! Applies small, constrained rewrites to verified SQL.

use super::parser::unwrap_reply;
use super::prompt::build_adjust_prompt;
use super::Oracle;
use crate::error::{Result, VouchError};
use std::sync::Arc;
use tracing::debug;

/// Rewrites a verified query's SQL to fit the asked question.
///
/// The rewrite is limited to surface details such as column aliases, year
/// literals and status values. Structure, table names and aggregations are
/// preserved by the prompt contract; the adjuster itself does not validate
/// the rewrite.
pub struct SqlAdjuster {
    oracle: Arc<dyn Oracle>,
}

impl SqlAdjuster {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Adjusts `sql` per `instructions`.
    ///
    /// Blank instructions are a no-op returning the original SQL without an
    /// oracle call. An empty rewrite from the oracle is an error, so a bad
    /// completion can never silently blank out the query.
    pub async fn adjust(&self, sql: &str, instructions: &str) -> Result<String> {
        if instructions.trim().is_empty() {
            debug!("no adjustment instructions, keeping SQL as is");
            return Ok(sql.to_string());
        }

        let prompt = build_adjust_prompt(sql, instructions);
        let raw = self.oracle.complete(&prompt).await?;
        let adjusted = unwrap_reply(&raw);

        if adjusted.is_empty() {
            return Err(VouchError::oracle("Adjuster returned an empty rewrite"));
        }

        debug!(original_len = sql.len(), adjusted_len = adjusted.len(), "adjusted SQL");
        Ok(adjusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MockOracle;

    #[tokio::test]
    async fn test_blank_instructions_skip_oracle() {
        let oracle = Arc::new(MockOracle::new());
        let adjuster = SqlAdjuster::new(oracle.clone());

        let sql = "SELECT COUNT(*) FROM orders WHERE year = 2019";
        let adjusted = adjuster.adjust(sql, "   ").await.unwrap();

        assert_eq!(adjusted, sql);
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_adjusted_sql_is_returned_raw() {
        let oracle = Arc::new(
            MockOracle::new().with_reply("SELECT COUNT(*) FROM orders WHERE year = 2017"),
        );
        let adjuster = SqlAdjuster::new(oracle);

        let adjusted = adjuster
            .adjust(
                "SELECT COUNT(*) FROM orders WHERE year = 2019",
                "change the year to 2017",
            )
            .await
            .unwrap();

        assert_eq!(adjusted, "SELECT COUNT(*) FROM orders WHERE year = 2017");
    }

    #[tokio::test]
    async fn test_fenced_reply_is_unwrapped() {
        let oracle = Arc::new(
            MockOracle::new().with_reply("```sql\nSELECT id AS order_id FROM orders\n```"),
        );
        let adjuster = SqlAdjuster::new(oracle);

        let adjusted = adjuster
            .adjust("SELECT id FROM orders", "alias id as order_id")
            .await
            .unwrap();

        assert_eq!(adjusted, "SELECT id AS order_id FROM orders");
    }

    #[tokio::test]
    async fn test_empty_rewrite_is_an_error() {
        let oracle = Arc::new(MockOracle::new().with_reply("```\n\n```"));
        let adjuster = SqlAdjuster::new(oracle);

        let result = adjuster
            .adjust("SELECT id FROM orders", "rename the column")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_prompt_carries_sql_and_instructions() {
        let oracle = Arc::new(MockOracle::new().with_reply("SELECT 1"));
        let adjuster = SqlAdjuster::new(oracle.clone());

        adjuster
            .adjust("SELECT region FROM orders", "alias region as area")
            .await
            .unwrap();

        let prompts = oracle.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("SELECT region FROM orders"));
        assert!(prompts[0].contains("alias region as area"));
    }
}
