//! Candidate locations for migration queries inside an analysis reply
//!
//! Ordered by priority. The first locator that produces a query wins.

use serde_json::Value;

/// Reply field holding the similar-issue sub-document.
/// The misspelling matches what the analysis collaborator emits.
pub const SIMILAR_ISSUES_FIELD: &str = "similiar_redmine_issues";

/// Issue arrays inside the similar-issue sub-document, scanned in this order
pub const RECORD_COLLECTIONS: &[&str] = &["redmine", "mantis"];

const RECORD_QUERY_FIELDS: &[&str] = &[
    "migrationQuery",
    "migration_query",
    "migrationQueries",
    "migration_queries",
    "sqlQueries",
    "queries",
];

const TEMP_FIX_FIELDS: &[&str] = &["tempFix", "temp_fix"];

/// How a locator reaches its candidate values
#[derive(Debug, Clone, Copy)]
pub enum LocatorKind {
    /// A field path below `reply`
    Path(&'static [&'static str]),
    /// The listed fields of every record in the issue arrays
    Records(&'static [&'static str]),
}

/// A named lookup strategy into the reply document
#[derive(Debug, Clone, Copy)]
pub struct Locator {
    pub name: &'static str,
    pub kind: LocatorKind,
}

impl Locator {
    const fn path(name: &'static str, path: &'static [&'static str]) -> Self {
        Self {
            name,
            kind: LocatorKind::Path(path),
        }
    }

    const fn records(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self {
            name,
            kind: LocatorKind::Records(fields),
        }
    }

    /// Candidate values this locator points at, in scan order
    ///
    /// Missing keys and wrong types simply produce no candidates.
    pub fn candidates<'a>(&self, reply: &'a Value) -> Vec<&'a Value> {
        match self.kind {
            LocatorKind::Path(path) => lookup(reply, path).into_iter().collect(),
            LocatorKind::Records(fields) => records(reply)
                .flat_map(|record| fields.iter().filter_map(move |f| record.get(*f)))
                .collect(),
        }
    }
}

/// All locators in priority order
pub const LOCATORS: &[Locator] = &[
    Locator::path("reply.migrationQuery", &["migrationQuery"]),
    Locator::path("reply.migration_query", &["migration_query"]),
    Locator::path("reply.migrationQueries", &["migrationQueries"]),
    Locator::path("reply.migration_queries", &["migration_queries"]),
    Locator::path("reply.sqlQueries", &["sqlQueries"]),
    Locator::path("reply.sql_queries", &["sql_queries"]),
    Locator::path("reply.queries", &["queries"]),
    Locator::path(
        "reply.similiar_redmine_issues.migrationQuery",
        &[SIMILAR_ISSUES_FIELD, "migrationQuery"],
    ),
    Locator::path(
        "reply.similiar_redmine_issues.migration_query",
        &[SIMILAR_ISSUES_FIELD, "migration_query"],
    ),
    Locator::path(
        "reply.similiar_redmine_issues.migrationQueries",
        &[SIMILAR_ISSUES_FIELD, "migrationQueries"],
    ),
    Locator::path(
        "reply.similiar_redmine_issues.migration_queries",
        &[SIMILAR_ISSUES_FIELD, "migration_queries"],
    ),
    Locator::records("similar_issue_records", RECORD_QUERY_FIELDS),
    Locator::path("reply.tempFix", &["tempFix"]),
    Locator::path("reply.temp_fix", &["temp_fix"]),
    Locator::records("similar_issue_records.tempFix", TEMP_FIX_FIELDS),
];

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.get(*key))
        .filter(|v| !v.is_null())
}

/// Records from `redmine[]` then `mantis[]`, skipping non-array collections
fn records(reply: &Value) -> impl Iterator<Item = &Value> {
    let similar = reply.get(SIMILAR_ISSUES_FIELD);
    RECORD_COLLECTIONS
        .iter()
        .filter_map(move |name| similar.and_then(|s| s.get(*name)).and_then(Value::as_array))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_missing_intermediate() {
        let reply = json!({ "similiar_redmine_issues": "not an object" });
        assert!(lookup(&reply, &[SIMILAR_ISSUES_FIELD, "migrationQuery"]).is_none());
    }

    #[test]
    fn test_lookup_skips_null() {
        let reply = json!({ "migrationQuery": null });
        assert!(lookup(&reply, &["migrationQuery"]).is_none());
    }

    #[test]
    fn test_records_in_collection_order() {
        let reply = json!({
            "similiar_redmine_issues": {
                "mantis": [{ "id": 3 }],
                "redmine": [{ "id": 1 }, { "id": 2 }]
            }
        });
        let ids: Vec<u64> = records(&reply)
            .filter_map(|r| r.get("id").and_then(Value::as_u64))
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_records_ignores_wrong_types() {
        let reply = json!({
            "similiar_redmine_issues": { "redmine": { "id": 1 }, "mantis": [{ "id": 7 }] }
        });
        assert_eq!(records(&reply).count(), 1);
    }

    #[test]
    fn test_temp_fix_locators_last() {
        let names: Vec<&str> = LOCATORS.iter().map(|l| l.name).collect();
        let temp_fix = names.iter().position(|n| *n == "reply.tempFix").unwrap();
        let records = names
            .iter()
            .position(|n| *n == "similar_issue_records")
            .unwrap();
        assert!(records < temp_fix);
        assert_eq!(names[0], "reply.migrationQuery");
    }
}
