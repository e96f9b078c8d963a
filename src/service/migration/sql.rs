//! SQL sniffing helpers for free-form analysis text
//!
//! The analysis collaborator returns prose, fenced code, or bare statements
//! interchangeably. These helpers decide whether a string looks like SQL and
//! pull fenced blocks out of surrounding text.

use std::sync::LazyLock;

use regex::Regex;

const FENCE_MARKER: &str = "```";

static SQL_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```[ \t]*sql(?:[ \t]*\n|[ \t]+)(.*?)```").unwrap());

/// Language tag is optional so single-line fences are stripped too
static GENERIC_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:[A-Za-z0-9_+-]*[ \t]*\n)?(.*?)```").unwrap());

static STATEMENT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|CREATE|ALTER|DROP|TRUNCATE|GRANT|REVOKE)\b")
        .unwrap()
});

static STRUCTURE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(FROM|WHERE|SET|VALUES|TABLE|DATABASE|INDEX)\b").unwrap()
});

static END_KEYWORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bEND\b").unwrap());

/// Check whether a string plausibly holds a SQL statement
///
/// Requires a statement keyword plus at least one of: a structural keyword,
/// a `;` terminator, the word END, or a code fence marker. Short DDL
/// snippets without a WHERE clause still pass.
pub fn looks_like_sql(text: &str) -> bool {
    if !STATEMENT_KEYWORD.is_match(text) {
        return false;
    }

    STRUCTURE_KEYWORD.is_match(text)
        || text.contains(';')
        || END_KEYWORD.is_match(text)
        || text.contains(FENCE_MARKER)
}

/// Content of the first ```` ```sql ```` fenced block, trimmed
pub fn sql_fenced_block(text: &str) -> Option<&str> {
    SQL_FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Content of the first fenced block of any language, trimmed
pub fn generic_fenced_block(text: &str) -> Option<&str> {
    GENERIC_FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Pull a SQL statement out of a single string value
///
/// A `sql`-tagged fence wins outright. Any other fence is only accepted when
/// its content validates. Otherwise the whole string is considered.
pub fn extract_sql_from_text(text: &str) -> Option<String> {
    if let Some(block) = sql_fenced_block(text) {
        return Some(block.to_string());
    }

    if let Some(block) = generic_fenced_block(text).filter(|block| looks_like_sql(block)) {
        return Some(block.to_string());
    }

    let trimmed = text.trim();
    if looks_like_sql(trimmed) {
        return Some(trimmed.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_with_structure_keyword() {
        assert!(looks_like_sql("SELECT id FROM users"));
        assert!(looks_like_sql("alter table users add column age int"));
        assert!(looks_like_sql("CREATE INDEX idx_users_email ON users(email)"));
    }

    #[test]
    fn test_terminator_only_branch() {
        assert!(looks_like_sql("UPDATE accounts_flag_reset;"));
        assert!(looks_like_sql("GRANT admin TO alice;"));
    }

    #[test]
    fn test_end_keyword_branch() {
        assert!(looks_like_sql("BEGIN\n  DELETE stale_rows\nEND"));
    }

    #[test]
    fn test_rejects_prose() {
        assert!(!looks_like_sql("Restart the service and clear the browser cache."));
        assert!(!looks_like_sql(""));
    }

    #[test]
    fn test_requires_whole_word_keyword() {
        // "selection" and "updated" must not count as statement keywords
        assert!(!looks_like_sql("The selection was updated from the table;"));
    }

    #[test]
    fn test_keyword_without_structure_rejected() {
        assert!(!looks_like_sql("Please select a different option"));
    }

    #[test]
    fn test_sql_fence_stripped() {
        assert_eq!(
            extract_sql_from_text("```sql\nSELECT * FROM t;\n```").as_deref(),
            Some("SELECT * FROM t;")
        );
    }

    #[test]
    fn test_sql_fence_case_insensitive_and_embedded() {
        let text = "Run this first:\n```SQL\nDELETE FROM sessions WHERE expired = 1;\n```\nthen restart.";
        assert_eq!(
            extract_sql_from_text(text).as_deref(),
            Some("DELETE FROM sessions WHERE expired = 1;")
        );
    }

    #[test]
    fn test_sqlite_tag_is_not_a_sql_fence() {
        assert!(sql_fenced_block("```sqlite\nhello\n```").is_none());
    }

    #[test]
    fn test_generic_fence_with_sql_accepted() {
        let text = "```\nUPDATE users SET locked = 0 WHERE id = 4;\n```";
        assert_eq!(
            extract_sql_from_text(text).as_deref(),
            Some("UPDATE users SET locked = 0 WHERE id = 4;")
        );
    }

    #[test]
    fn test_generic_fence_without_sql_rejected() {
        assert!(extract_sql_from_text("```\nhello world\n```").is_none());
    }

    #[test]
    fn test_bare_statement_trimmed() {
        assert_eq!(
            extract_sql_from_text("  DROP TABLE tmp_import;  \n").as_deref(),
            Some("DROP TABLE tmp_import;")
        );
    }

    #[test]
    fn test_sql_prefixed_tag_does_not_leak_into_query() {
        assert!(sql_fenced_block("```sql-server\nSELECT 1 FROM t;\n```").is_none());
        assert_eq!(
            extract_sql_from_text("```sql-server\nSELECT 1 FROM t;\n```").as_deref(),
            Some("SELECT 1 FROM t;")
        );
    }

    #[test]
    fn test_single_line_sql_fence() {
        assert_eq!(
            extract_sql_from_text("```sql DELETE FROM t WHERE id = 1;```").as_deref(),
            Some("DELETE FROM t WHERE id = 1;")
        );
    }

    #[test]
    fn test_single_line_generic_fence_stripped() {
        assert_eq!(
            extract_sql_from_text("```SELECT * FROM t;```").as_deref(),
            Some("SELECT * FROM t;")
        );
        assert_eq!(
            extract_sql_from_text("``` DELETE FROM t WHERE id = 1; ```").as_deref(),
            Some("DELETE FROM t WHERE id = 1;")
        );
    }

    #[test]
    fn test_empty_sql_fence_falls_through() {
        assert!(extract_sql_from_text("```sql\n```").is_none());
    }
}
