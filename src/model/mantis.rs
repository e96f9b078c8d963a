//! Mantis issue records
//!
//! Mantis names things differently from Redmine: `summary` for the title,
//! `handler` for the assignee, `created_at`/`updated_at` for timestamps.

use serde::Deserialize;

use super::issue::{
    Issue, IssueSource, NO_DESCRIPTION, NamedField, RecordId, SimilarIssue, UNASSIGNED, named_or,
};

/// Response of `GET /api/rest/issues[/{id}]`
#[derive(Debug, Default, Deserialize)]
pub struct MantisIssueList {
    #[serde(default)]
    pub issues: Vec<MantisRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MantisRecord {
    pub id: Option<RecordId>,
    pub summary: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<NamedField>,
    pub priority: Option<NamedField>,
    pub handler: Option<NamedField>,
    pub assignee: Option<NamedField>,
    pub created_at: Option<String>,
    pub created: Option<String>,
    pub updated_at: Option<String>,
    pub updated: Option<String>,
    pub similarity_percentage: Option<f64>,
    #[serde(rename = "contactPerson")]
    pub contact_person: Option<String>,
    pub resolution: Option<NamedField>,
    #[serde(rename = "closedBy")]
    pub closed_by: Option<String>,
}

impl MantisRecord {
    /// Canonical issue, or `None` when the record carries no usable id
    pub fn to_issue(&self) -> Option<Issue> {
        let id = self.id.as_ref()?.value()?;

        Some(Issue {
            id,
            title: self
                .summary
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
            assignee: named_or(self.handler.as_ref().or(self.assignee.as_ref()), UNASSIGNED),
            created: self
                .created_at
                .clone()
                .or_else(|| self.created.clone())
                .unwrap_or_default(),
            updated: self
                .updated_at
                .clone()
                .or_else(|| self.updated.clone())
                .unwrap_or_default(),
            source: IssueSource::Mantis,
        })
    }

    pub fn to_similar_issue(&self) -> Option<SimilarIssue> {
        let issue = self.to_issue()?;

        // Mantis reports an "open" resolution on unresolved issues
        let resolution = self
            .resolution
            .as_ref()
            .and_then(NamedField::name)
            .filter(|r| !r.eq_ignore_ascii_case("open"))
            .map(str::to_string);

        Some(SimilarIssue {
            similarity_percentage: self.similarity_percentage,
            contact_person: self
                .contact_person
                .clone()
                .or_else(|| self.handler.as_ref().and_then(NamedField::name).map(str::to_string)),
            resolution,
            closed_by: self.closed_by.clone(),
            ..SimilarIssue::from(issue)
        })
    }
}
