//! Response types for the question-answering service.

use crate::catalog::{display_value, TableData};
use serde::Deserialize;

/// Parsed reply from the answer endpoint. Every field is optional on the
/// wire; missing fields default so one malformed key never sinks the reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerReply {
    /// Natural-language answer text.
    #[serde(default)]
    pub answer: String,

    /// The SQL the service generated for the question.
    #[serde(default)]
    pub sql_query: String,

    /// Explanation of what the generated SQL does.
    #[serde(default)]
    pub query_explanation: String,

    /// Catalog tables the query touches.
    #[serde(default)]
    pub tables_used: Vec<String>,

    /// Follow-up questions the service suggests.
    #[serde(default)]
    pub related_questions: Vec<String>,

    /// Executed rows, keyed "Row 1", "Row 2", … with cell lists.
    #[serde(default)]
    pub execution_result: serde_json::Map<String, serde_json::Value>,
}

impl AnswerReply {
    /// True when the service produced any SQL at all.
    pub fn has_sql(&self) -> bool {
        !self.sql_query.trim().is_empty()
    }

    /// Reshapes `execution_result` into a table.
    ///
    /// Rows are ordered by the numeric suffix of their "Row N" key, so
    /// "Row 10" sorts after "Row 9" instead of between "Row 1" and "Row 2".
    /// Keys without a parseable suffix are skipped, as are cells without a
    /// `columnName`. Columns appear in first-seen order.
    pub fn result_table(&self) -> TableData {
        let mut indexed: Vec<(u64, &Vec<serde_json::Value>)> = self
            .execution_result
            .iter()
            .filter_map(|(key, value)| {
                let index = row_index(key)?;
                let cells = value.as_array()?;
                Some((index, cells))
            })
            .collect();
        indexed.sort_by_key(|(index, _)| *index);

        let mut columns: Vec<String> = Vec::new();
        let mut named_rows: Vec<Vec<(String, String)>> = Vec::new();

        for (_, cells) in indexed {
            let mut named = Vec::new();
            for cell in cells {
                let Some(object) = cell.as_object() else {
                    continue;
                };
                let Some(name) = object.get("columnName").and_then(|v| v.as_str()) else {
                    continue;
                };
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
                named.push((name.to_string(), display_value(object.get("value"))));
            }
            named_rows.push(named);
        }

        let rows = named_rows
            .into_iter()
            .map(|cells| {
                columns
                    .iter()
                    .map(|col| {
                        cells
                            .iter()
                            .find(|(name, _)| name == col)
                            .map(|(_, value)| value.clone())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        TableData::new(columns, rows)
    }
}

/// Extracts N from a "Row N" key.
fn row_index(key: &str) -> Option<u64> {
    key.strip_prefix("Row")?.trim().parse().ok()
}
