//! Tabular result types and response normalization.

use serde::Deserialize;
use std::time::Duration;

/// A normalized tabular result: ordered columns, rows of display strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Wall time of the producing call, when the caller measured one.
    pub elapsed: Option<Duration>,
}

impl TableData {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            elapsed: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Wire shape of the catalog's execution response.
#[derive(Debug, Deserialize)]
pub(crate) struct ExecuteResponse {
    #[serde(default)]
    pub rows: Vec<ResponseRow>,

    #[serde(default, rename = "columnNames")]
    pub column_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseRow {
    #[serde(default)]
    pub values: Vec<ResponseCell>,
}

/// One cell of a response row. The upstream API is inconsistent about the
/// field carrying the column name, so both spellings are accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseCell {
    #[serde(rename = "columnName")]
    pub column_name: Option<String>,

    pub column: Option<String>,

    pub value: Option<serde_json::Value>,
}

impl ResponseCell {
    /// Prefers `columnName`, falls back to `column`.
    pub fn resolved_name(&self) -> Option<&str> {
        self.column_name.as_deref().or(self.column.as_deref())
    }
}

/// Flattens the catalog's row/cell shape into a `TableData`.
///
/// Column order is the declared `columnNames` list followed by any column
/// first seen in a cell. Cells without a resolvable name are skipped; a row
/// missing a column renders that cell blank.
pub(crate) fn normalize(response: ExecuteResponse) -> TableData {
    let mut columns = response.column_names;
    let mut named_rows: Vec<Vec<(String, String)>> = Vec::new();

    for row in response.rows {
        let mut cells = Vec::new();
        for cell in row.values {
            let Some(name) = cell.resolved_name() else {
                continue;
            };
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
            cells.push((name.to_string(), display_value(cell.value.as_ref())));
        }
        named_rows.push(cells);
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

    TableData {
        columns,
        rows,
        elapsed: None,
    }
}

/// Renders a JSON cell value as a display string. Nulls render as "NULL".
pub fn display_value(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "NULL".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(body: &str) -> TableData {
        normalize(serde_json::from_str::<ExecuteResponse>(body).unwrap())
    }

    #[test]
    fn test_normalize_single_cell() {
        let table = parse(r#"{"rows":[{"values":[{"columnName":"A","value":"1"}]}]}"#);
        assert_eq!(table.columns, vec!["A"]);
        assert_eq!(table.rows, vec![vec!["1".to_string()]]);
    }

    #[test]
    fn test_normalize_column_field_fallback() {
        let table = parse(r#"{"rows":[{"values":[{"column":"total","value":42}]}]}"#);
        assert_eq!(table.columns, vec!["total"]);
        assert_eq!(table.rows, vec![vec!["42".to_string()]]);
    }

    #[test]
    fn test_normalize_prefers_column_name_over_column() {
        let table = parse(
            r#"{"rows":[{"values":[{"columnName":"good","column":"bad","value":"x"}]}]}"#,
        );
        assert_eq!(table.columns, vec!["good"]);
    }

    #[test]
    fn test_normalize_skips_nameless_cells() {
        let table = parse(r#"{"rows":[{"values":[{"value":"orphan"},{"columnName":"A","value":"1"}]}]}"#);
        assert_eq!(table.columns, vec!["A"]);
        assert_eq!(table.rows, vec![vec!["1".to_string()]]);
    }

    #[test]
    fn test_normalize_declared_columns_lead_ordering() {
        let table = parse(
            r#"{
                "columnNames": ["region", "total"],
                "rows": [
                    {"values": [
                        {"columnName": "total", "value": 7},
                        {"columnName": "region", "value": "west"},
                        {"columnName": "extra", "value": true}
                    ]}
                ]
            }"#,
        );
        assert_eq!(table.columns, vec!["region", "total", "extra"]);
        assert_eq!(
            table.rows,
            vec![vec!["west".to_string(), "7".to_string(), "true".to_string()]]
        );
    }

    #[test]
    fn test_normalize_missing_cell_renders_blank() {
        let table = parse(
            r#"{
                "rows": [
                    {"values": [{"columnName": "a", "value": "1"}, {"columnName": "b", "value": "2"}]},
                    {"values": [{"columnName": "b", "value": "3"}]}
                ]
            }"#,
        );
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["1".to_string(), "2".to_string()],
                vec!["".to_string(), "3".to_string()],
            ]
        );
    }

    #[test]
    fn test_normalize_empty_response() {
        let table = parse("{}");
        assert!(table.columns.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_display_value_variants() {
        use serde_json::json;

        assert_eq!(display_value(None), "NULL");
        assert_eq!(display_value(Some(&json!(null))), "NULL");
        assert_eq!(display_value(Some(&json!("text"))), "text");
        assert_eq!(display_value(Some(&json!(3.5))), "3.5");
        assert_eq!(display_value(Some(&json!(false))), "false");
        assert_eq!(display_value(Some(&json!([1, 2]))), "[1,2]");
    }

    #[test]
    fn test_with_elapsed() {
        let table = TableData::new(vec!["a".to_string()], vec![]).with_elapsed(Duration::from_millis(120));
        assert_eq!(table.elapsed, Some(Duration::from_millis(120)));
        assert_eq!(table.row_count(), 0);
    }
}
