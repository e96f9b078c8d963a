use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of migration query extraction
///
/// Either a SQL statement with advisory recommendations, or the explicit
/// not-found state with no query and no recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractedQuery {
    /// Whether a query was located
    pub found: bool,
    /// The extracted statement, trimmed
    pub query: Option<String>,
    /// Static advice shown alongside a query
    pub recommendations: Vec<String>,
    /// Name of the locator that matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

impl ExtractedQuery {
    pub fn found(query: String, locator: &str, recommendations: &[&str]) -> Self {
        Self {
            found: true,
            query: Some(query),
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
            locator: Some(locator.to_string()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            query: None,
            recommendations: Vec::new(),
            locator: None,
        }
    }
}
