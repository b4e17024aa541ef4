//! Prompt construction for the matcher and the adjuster.

use crate::store::VerifiedQuery;

/// Template for the matching judgment. `{queries}` and `{question}` are
/// substituted at build time; the literal braces in the reply schema are part
/// of the prompt.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"You are matching an analyst's question against a library of verified SQL queries.

Verified queries:
{queries}

Analyst question: "{question}"

Decide whether one of the verified queries answers the question. A query still counts as a match when it needs small modifications, such as a different year, a different status value, or renamed output columns.

Respond with exactly one line of JSON and nothing else:
{"match": true|false, "query_number": <1-based number of the matching query, or 0>, "similarity": <0-100>, "modification_needed": true|false, "modifications": "<what must change, or an empty string>"}"#;

/// Template for the SQL rewrite. `{sql}` and `{instructions}` are substituted
/// at build time.
pub const ADJUST_PROMPT_TEMPLATE: &str = r#"Rewrite the SQL below according to the instructions.

Original SQL:
{sql}

Instructions: {instructions}

Rules:
- Change only column aliases, year literals, and status value literals
- Preserve the structure, the table names, and the aggregation functions
- Keep any comments unchanged
- Reply with the rewritten SQL only: no explanation, no markdown fences"#;

/// Enumerates the verified queries the way the matcher prompt expects,
/// numbered from 1.
pub fn format_verified_queries(queries: &[VerifiedQuery]) -> String {
    let mut out = String::new();
    for (i, query) in queries.iter().enumerate() {
        out.push_str(&format!(
            "Query {}:\nName: {}\nQuestion: {}\nSQL: {}\nExplanation: {}\n\n",
            i + 1,
            query.name,
            query.question,
            query.sql,
            query.query_explanation
        ));
    }
    out.trim_end().to_string()
}

/// Builds the matcher prompt for a question against the verified collection.
pub fn build_match_prompt(question: &str, queries: &[VerifiedQuery]) -> String {
    MATCH_PROMPT_TEMPLATE
        .replace("{queries}", &format_verified_queries(queries))
        .replace("{question}", question)
}

/// Builds the adjuster prompt for a rewrite.
pub fn build_adjust_prompt(sql: &str, instructions: &str) -> String {
    ADJUST_PROMPT_TEMPLATE
        .replace("{sql}", sql)
        .replace("{instructions}", instructions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, question: &str, sql: &str) -> VerifiedQuery {
        VerifiedQuery {
            name: name.to_string(),
            question: question.to_string(),
            verified_at: "01 March 2026".to_string(),
            verified_by: "rivera".to_string(),
            query_explanation: format!("Explains {name}."),
            sql: sql.to_string(),
        }
    }

    #[test]
    fn test_format_enumerates_from_one() {
        let queries = vec![
            sample("orders 2018", "orders delivered in 2018", "SELECT 1"),
            sample("top cities", "which city ordered most", "SELECT 2"),
        ];

        let text = format_verified_queries(&queries);
        assert!(text.starts_with("Query 1:\nName: orders 2018"));
        assert!(text.contains("Query 2:\nName: top cities"));
        assert!(text.contains("SQL: SELECT 2"));
        assert!(text.contains("Explanation: Explains top cities."));
    }

    #[test]
    fn test_match_prompt_substitutes_both_placeholders() {
        let queries = vec![sample("only", "the question", "SELECT 42")];
        let prompt = build_match_prompt("how many orders shipped in 2017", &queries);

        assert!(!prompt.contains("{queries}"));
        assert!(!prompt.contains("{question}"));
        assert!(prompt.contains("how many orders shipped in 2017"));
        assert!(prompt.contains("SELECT 42"));
        // The reply schema keeps its literal braces.
        assert!(prompt.contains("{\"match\": true|false"));
    }

    #[test]
    fn test_adjust_prompt_substitutes_both_placeholders() {
        let prompt = build_adjust_prompt(
            "SELECT COUNT(*) FROM orders",
            "change the year to 2017",
        );

        assert!(!prompt.contains("{sql}"));
        assert!(!prompt.contains("{instructions}"));
        assert!(prompt.contains("SELECT COUNT(*) FROM orders"));
        assert!(prompt.contains("change the year to 2017"));
        assert!(prompt.contains("aggregation functions"));
    }
}
