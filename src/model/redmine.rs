//! Redmine issue records
//!
//! Covers both the Redmine REST payloads (`subject`, `assigned_to`,
//! `created_on`) and the looser records the analysis collaborator echoes
//! back (`title`, `assignee`, `created`).

use serde::Deserialize;

use super::issue::{
    Issue, IssueSource, NO_DESCRIPTION, NamedField, RecordId, SimilarIssue, UNASSIGNED, named_or,
};

/// Response of `GET /issues/{id}.json`
#[derive(Debug, Deserialize)]
pub struct RedmineIssueResponse {
    pub issue: RedmineRecord,
}

/// Response of `GET /issues.json`
#[derive(Debug, Default, Deserialize)]
pub struct RedmineIssueList {
    #[serde(default)]
    pub issues: Vec<RedmineRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedmineRecord {
    pub id: Option<RecordId>,
    pub subject: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<NamedField>,
    pub priority: Option<NamedField>,
    pub assigned_to: Option<NamedField>,
    pub assignee: Option<NamedField>,
    pub created_on: Option<String>,
    pub created: Option<String>,
    pub updated_on: Option<String>,
    pub updated: Option<String>,
    pub similarity_percentage: Option<f64>,
    #[serde(rename = "contactPerson")]
    pub contact_person: Option<String>,
    pub resolution: Option<NamedField>,
    #[serde(rename = "closedBy")]
    pub closed_by: Option<String>,
}

impl RedmineRecord {
    /// Canonical issue, or `None` when the record carries no usable id
    pub fn to_issue(&self) -> Option<Issue> {
        let id = self.id.as_ref()?.value()?;

        Some(Issue {
            id,
            title: self
                .subject
                .clone()
                .or_else(|| self.title.clone())
                .unwrap_or_default(),
            description: self
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            status: named_or(self.status.as_ref(), "Unknown"),
            priority: named_or(self.priority.as_ref(), "Normal"),
            assignee: named_or(self.assigned_to.as_ref().or(self.assignee.as_ref()), UNASSIGNED),
            created: self
                .created_on
                .clone()
                .or_else(|| self.created.clone())
                .unwrap_or_default(),
            updated: self
                .updated_on
                .clone()
                .or_else(|| self.updated.clone())
                .unwrap_or_default(),
            source: IssueSource::Redmine,
        })
    }

    pub fn to_similar_issue(&self) -> Option<SimilarIssue> {
        let issue = self.to_issue()?;

        Some(SimilarIssue {
            similarity_percentage: self.similarity_percentage,
            contact_person: self.contact_person.clone(),
            resolution: self
                .resolution
                .as_ref()
                .and_then(NamedField::name)
                .map(str::to_string),
            closed_by: self.closed_by.clone(),
            ..SimilarIssue::from(issue)
        })
    }
}
