//! Migration query extraction from similar-issue analysis replies
//!
//! The analysis collaborator has no fixed schema. A remediation query may
//! sit in a dedicated field, in a list of queries, inside one of the
//! similar-issue records, or buried in free-text "temp fix" advice. This
//! module walks a fixed list of candidate locations in priority order and
//! returns the first string that looks like SQL.

mod locators;
pub mod sql;

use serde_json::Value;

use crate::model::ExtractedQuery;
use locators::{LOCATORS, Locator};

pub use locators::{RECORD_COLLECTIONS, SIMILAR_ISSUES_FIELD};

/// Maximum nesting below a candidate value that is searched
pub const MAX_SEARCH_DEPTH: usize = 4;

/// Field names probed, in order, when a candidate is an object
const NESTED_QUERY_FIELDS: &[&str] = &[
    "sql",
    "query",
    "text",
    "migrationQuery",
    "migration_query",
    "value",
    "content",
    "code",
];

/// Advisory notes attached to every extracted query
pub const RECOMMENDATIONS: &[&str] = &[
    "Review the query carefully before executing it against any database",
    "Test the migration in a staging environment first",
    "Monitor the system after deployment",
];

/// Locate the most likely migration query in an analysis reply
///
/// Never fails: a document without a usable query yields
/// [`ExtractedQuery::not_found`].
pub fn extract_migration_query(document: &Value) -> ExtractedQuery {
    let Some(reply) = document.get("reply") else {
        tracing::debug!("Analysis document has no reply object");
        return ExtractedQuery::not_found();
    };

    for locator in LOCATORS {
        if let Some(query) = evaluate(locator, reply) {
            tracing::debug!(locator = locator.name, "Migration query located");
            return ExtractedQuery::found(query, locator.name, RECOMMENDATIONS);
        }
    }

    tracing::debug!("No migration query found in analysis reply");
    ExtractedQuery::not_found()
}

fn evaluate(locator: &Locator, reply: &Value) -> Option<String> {
    locator
        .candidates(reply)
        .into_iter()
        .find_map(|candidate| search_value(candidate, 0))
}

/// Depth-limited search for SQL text inside a candidate value
fn search_value(value: &Value, depth: usize) -> Option<String> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }

    match value {
        Value::String(text) => sql::extract_sql_from_text(text),
        Value::Array(items) => items.iter().find_map(|item| search_value(item, depth + 1)),
        Value::Object(map) => NESTED_QUERY_FIELDS
            .iter()
            .filter_map(|field| map.get(*field))
            .find_map(|nested| search_value(nested, depth + 1)),
        _ => None,
    }
}
