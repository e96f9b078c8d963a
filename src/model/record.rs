use super::issue::{IssueSource, SimilarIssue};
use super::mantis::MantisRecord;
use super::redmine::RedmineRecord;

/// An issue record tagged with the tracker it came from
#[derive(Debug, Clone)]
pub enum SourceRecord {
    Redmine(RedmineRecord),
    Mantis(MantisRecord),
}

impl SourceRecord {
    /// Decode a loosely typed record as the given source's shape
    pub fn from_value(
        source: IssueSource,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match source {
            IssueSource::Redmine => SourceRecord::Redmine(serde_json::from_value(value)?),
            IssueSource::Mantis => SourceRecord::Mantis(serde_json::from_value(value)?),
        })
    }

    pub fn source(&self) -> IssueSource {
        match self {
            SourceRecord::Redmine(_) => IssueSource::Redmine,
            SourceRecord::Mantis(_) => IssueSource::Mantis,
        }
    }

    /// Map either shape onto the canonical similar-issue form
    pub fn normalize(&self) -> Option<SimilarIssue> {
        match self {
            SourceRecord::Redmine(record) => record.to_similar_issue(),
            SourceRecord::Mantis(record) => record.to_similar_issue(),
        }
    }
}
