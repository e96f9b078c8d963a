//! Canonical issue shapes shared by every tracker

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const NO_DESCRIPTION: &str = "No description available";
pub const UNASSIGNED: &str = "Unassigned";

/// Issue tracker an issue originates from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueSource {
    #[default]
    Redmine,
    Mantis,
}

impl IssueSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSource::Redmine => "redmine",
            IssueSource::Mantis => "mantis",
        }
    }
}

impl fmt::Display for IssueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueIdError {
    #[error("Issue ID is required")]
    Missing,

    #[error("Please enter a valid numeric Issue ID")]
    Invalid(String),
}

/// Positive numeric issue identifier entered by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueId(u64);

impl FromStr for IssueId {
    type Err = IssueIdError;

    /// Accepts only the canonical decimal form of a positive integer
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(IssueIdError::Missing);
        }

        match raw.parse::<u64>() {
            Ok(id) if id > 0 && id.to_string() == raw => Ok(Self(id)),
            _ => Err(IssueIdError::Invalid(raw.to_string())),
        }
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for IssueId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Issue details in tracker-independent form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Issue {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
    pub created: String,
    pub updated: String,
    pub source: IssueSource,
}

/// An issue related to the one being investigated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimilarIssue {
    #[serde(flatten)]
    pub issue: Issue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_percentage: Option<f64>,
    #[serde(rename = "contactPerson", skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(rename = "closedBy", skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<String>,
}

impl From<Issue> for SimilarIssue {
    fn from(issue: Issue) -> Self {
        Self {
            issue,
            similarity_percentage: None,
            contact_person: None,
            resolution: None,
            closed_by: None,
        }
    }
}

/// A tracker field that arrives either as plain text or as `{ "name": ... }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NamedField {
    Text(String),
    Named {
        #[serde(default)]
        name: Option<String>,
    },
    Other(serde_json::Value),
}

impl NamedField {
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            NamedField::Text(text) => Some(text.as_str()),
            NamedField::Named { name } => name.as_deref(),
            NamedField::Other(_) => None,
        };
        name.filter(|s| !s.trim().is_empty())
    }
}

/// Record identifier that may arrive as a number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl RecordId {
    pub fn value(&self) -> Option<u64> {
        match self {
            RecordId::Number(id) => Some(*id),
            RecordId::Text(text) => text.trim().trim_start_matches('#').parse().ok(),
        }
    }
}

/// Resolve an optional named field to display text
pub(crate) fn named_or(field: Option<&NamedField>, fallback: &str) -> String {
    field
        .and_then(NamedField::name)
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_id_accepts_canonical_positive() {
        assert_eq!("1234".parse::<IssueId>(), Ok(IssueId::from(1234)));
        assert_eq!(" 42 ".parse::<IssueId>().unwrap().to_string(), "42");
    }

    #[test]
    fn test_issue_id_required() {
        assert_eq!("".parse::<IssueId>(), Err(IssueIdError::Missing));
        assert_eq!("   ".parse::<IssueId>(), Err(IssueIdError::Missing));
    }

    #[test]
    fn test_issue_id_rejects_non_canonical() {
        for raw in ["0", "-3", "12a", "012", "1.5", "+7", "abc"] {
            assert!(
                matches!(raw.parse::<IssueId>(), Err(IssueIdError::Invalid(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_issue_id_error_messages() {
        assert_eq!(IssueIdError::Missing.to_string(), "Issue ID is required");
        assert_eq!(
            IssueIdError::Invalid("x".into()).to_string(),
            "Please enter a valid numeric Issue ID"
        );
    }

    #[test]
    fn test_named_field_variants() {
        let text: NamedField = serde_json::from_str(r#""Open""#).unwrap();
        let named: NamedField = serde_json::from_str(r#"{"id": 1, "name": "High"}"#).unwrap();
        let empty: NamedField = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(text.name(), Some("Open"));
        assert_eq!(named.name(), Some("High"));
        assert_eq!(empty.name(), None);
        assert_eq!(named_or(Some(&empty), UNASSIGNED), UNASSIGNED);
    }

    #[test]
    fn test_record_id_forms() {
        let number: RecordId = serde_json::from_str("101").unwrap();
        let text: RecordId = serde_json::from_str(r##""#202""##).unwrap();
        let junk: RecordId = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(number.value(), Some(101));
        assert_eq!(text.value(), Some(202));
        assert_eq!(junk.value(), None);
    }

    #[test]
    fn test_similar_issue_serializes_flat() {
        let issue = Issue {
            id: 101,
            title: "Login timeout on mobile app".into(),
            description: NO_DESCRIPTION.into(),
            status: "Resolved".into(),
            priority: "High".into(),
            assignee: "Alice Johnson".into(),
            created: "2024-01-15 14:20:00".into(),
            updated: "2024-01-18 16:30:00".into(),
            source: IssueSource::Redmine,
        };
        let similar = SimilarIssue {
            similarity_percentage: Some(92.5),
            contact_person: Some("alice.johnson@company.com".into()),
            ..SimilarIssue::from(issue)
        };
        let json = serde_json::to_value(&similar).unwrap();
        assert_eq!(json["id"], 101);
        assert_eq!(json["source"], "redmine");
        assert_eq!(json["contactPerson"], "alice.johnson@company.com");
        assert!(json.get("closedBy").is_none());
    }
}
