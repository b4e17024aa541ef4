//! Reply cleanup for oracle outputs.
//!
//! Models are told to answer with bare JSON or bare SQL, but replies still
//! arrive wrapped in markdown fences or quotes often enough that both the
//! matcher and the adjuster unwrap them before parsing.

/// Unwraps an oracle reply: removes one markdown fence if the reply is
/// fenced, then trims whitespace and strips matching wrapping quotes.
pub fn unwrap_reply(reply: &str) -> String {
    let trimmed = reply.trim();
    let inner = fenced_block(trimmed).unwrap_or(trimmed);
    strip_wrapping_quotes(inner.trim()).to_string()
}

/// Returns the content of the first fenced code block, if any. The language
/// tag on the opening fence is ignored.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let content_start = after_fence.find('\n')? + 1;
    let content = &after_fence[content_start..];
    let end = content.find("```")?;
    Some(&content[..end])
}

/// Strips matching pairs of wrapping quote characters.
fn strip_wrapping_quotes(text: &str) -> &str {
    let mut current = text;
    loop {
        let stripped = strip_one_pair(current);
        if stripped.len() == current.len() {
            return current;
        }
        current = stripped.trim();
    }
}

fn strip_one_pair(text: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_reply_is_trimmed() {
        assert_eq!(unwrap_reply("  SELECT 1  \n"), "SELECT 1");
    }

    #[test]
    fn test_sql_fence_is_unwrapped() {
        let reply = "```sql\nSELECT COUNT(*) FROM orders\n```";
        assert_eq!(unwrap_reply(reply), "SELECT COUNT(*) FROM orders");
    }

    #[test]
    fn test_bare_fence_is_unwrapped() {
        let reply = "```\nSELECT 1\n```";
        assert_eq!(unwrap_reply(reply), "SELECT 1");
    }

    #[test]
    fn test_fence_with_surrounding_prose() {
        let reply = "Here is the rewrite:\n```sql\nSELECT 2\n```\nLet me know!";
        assert_eq!(unwrap_reply(reply), "SELECT 2");
    }

    #[test]
    fn test_wrapping_quotes_are_stripped() {
        assert_eq!(unwrap_reply("\"SELECT 1\""), "SELECT 1");
        assert_eq!(unwrap_reply("'SELECT 1'"), "SELECT 1");
        assert_eq!(unwrap_reply("'\"SELECT 1\"'"), "SELECT 1");
    }

    #[test]
    fn test_interior_quotes_survive() {
        let reply = r#"SELECT COUNT(*) AS "Orders Shipped" FROM orders"#;
        assert_eq!(unwrap_reply(reply), reply);
    }

    #[test]
    fn test_json_line_survives_unchanged() {
        let reply = r#"{"match": true, "query_number": 1, "similarity": 90, "modification_needed": false, "modifications": ""}"#;
        assert_eq!(unwrap_reply(reply), reply);
    }

    #[test]
    fn test_multiline_sql_keeps_interior_newlines() {
        let reply = "```sql\nSELECT a,\n       b\nFROM t\n```";
        assert_eq!(unwrap_reply(reply), "SELECT a,\n       b\nFROM t");
    }
}
