//! Client for the similar-issues analysis collaborator
//!
//! The collaborator receives the issue under investigation and replies with
//! a loosely structured document: related Redmine and Mantis records, free
//! text advice and, sometimes, a migration query.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::model::{AnalysisConfig, Issue, IssueSource, SimilarIssue, SourceRecord};
use crate::service::migration::{RECORD_COLLECTIONS, SIMILAR_ISSUES_FIELD};

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis endpoint not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Request body sent to the collaborator
#[derive(Debug, Serialize)]
struct SimilarIssuesRequest<'a> {
    issue_id: u64,
    source: IssueSource,
    title: &'a str,
    description: &'a str,
}

/// Client for the "ask similar issues" endpoint
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    endpoint: Option<String>,
}

impl AnalysisClient {
    pub fn new(config: AnalysisConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        match &config.endpoint {
            Some(endpoint) => tracing::info!(endpoint = %endpoint, "Analysis endpoint configured"),
            None => tracing::warn!("Analysis endpoint not configured, analysis disabled"),
        }

        Self {
            client,
            endpoint: config.endpoint.map(|u| u.to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Ask the collaborator for issues similar to `issue`
    ///
    /// Returns the raw reply document; its shape is not guaranteed.
    pub async fn ask_similar_issues(&self, issue: &Issue) -> Result<Value, AnalysisError> {
        let endpoint = self.endpoint.as_deref().ok_or(AnalysisError::NotConfigured)?;

        tracing::debug!(issue_id = issue.id, source = %issue.source, "Requesting similar issue analysis");

        let request = SimilarIssuesRequest {
            issue_id: issue.id,
            source: issue.source,
            title: &issue.title,
            description: &issue.description,
        };

        let response = self.client.post(endpoint).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::UnexpectedStatus { status, body });
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::ParseError(format!("Invalid analysis reply: {}", e)))?;

        tracing::debug!(issue_id = issue.id, "Received similar issue analysis");
        Ok(document)
    }
}

/// Normalize the similar-issue records of an analysis reply
///
/// Records from both sources are ordered by similarity, highest first, with
/// unscored records last. Among equal scores the reply order holds, Redmine
/// records before Mantis. Records that do not decode are skipped.
pub fn parse_similar_issues(document: &Value) -> Vec<SimilarIssue> {
    let Some(similar) = document
        .get("reply")
        .and_then(|reply| reply.get(SIMILAR_ISSUES_FIELD))
    else {
        return Vec::new();
    };

    let mut issues: Vec<SimilarIssue> = RECORD_COLLECTIONS
        .iter()
        .filter_map(|name| {
            let source = match *name {
                "redmine" => IssueSource::Redmine,
                "mantis" => IssueSource::Mantis,
                _ => return None,
            };
            let records = similar.get(*name)?.as_array()?;
            Some(records.iter().map(move |record| (source, record)))
        })
        .flatten()
        .filter_map(|(source, record)| {
            match SourceRecord::from_value(source, record.clone()) {
                Ok(record) => {
                    let normalized = record.normalize();
                    if normalized.is_none() {
                        tracing::debug!(source = %record.source(), "Skipping similar issue without id");
                    }
                    normalized
                }
                Err(e) => {
                    tracing::debug!(source = %source, error = %e, "Skipping undecodable similar issue");
                    None
                }
            }
        })
        .collect();

    // Stable sort keeps reply order among equal scores
    issues.sort_by(|a, b| match (a.similarity_percentage, b.similarity_percentage) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_both_sources() {
        let doc = json!({
            "reply": {
                "similiar_redmine_issues": {
                    "redmine": [
                        { "id": 101, "title": "Login timeout on mobile app", "similarity_percentage": 92.5 },
                        { "id": 102, "subject": "Auth service failures", "similarity_percentage": 88.3 }
                    ],
                    "mantis": [
                        { "id": 201, "summary": "User session issues", "handler": { "name": "carol" }, "similarity_percentage": 90.2 }
                    ]
                }
            }
        });
        let issues = parse_similar_issues(&doc);
        let ids: Vec<u64> = issues.iter().map(|s| s.issue.id).collect();
        assert_eq!(ids, vec![101, 201, 102]);
        assert_eq!(issues[1].issue.source, IssueSource::Mantis);
        assert_eq!(issues[1].issue.assignee, "carol");
    }

    #[test]
    fn test_unscored_records_keep_order_last() {
        let doc = json!({
            "reply": {
                "similiar_redmine_issues": {
                    "redmine": [{ "id": 1 }, { "id": 2, "similarity_percentage": 50.0 }],
                    "mantis": [{ "id": 3 }]
                }
            }
        });
        let ids: Vec<u64> = parse_similar_issues(&doc).iter().map(|s| s.issue.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_bad_records_skipped() {
        let doc = json!({
            "reply": {
                "similiar_redmine_issues": {
                    "redmine": [42, { "title": "no id" }, { "id": 7, "status": 5 }],
                    "mantis": "not a list"
                }
            }
        });
        let issues = parse_similar_issues(&doc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue.id, 7);
        assert_eq!(issues[0].issue.status, "Unknown");
    }

    #[test]
    fn test_missing_reply_yields_nothing() {
        assert!(parse_similar_issues(&json!({})).is_empty());
        assert!(parse_similar_issues(&json!({ "reply": [] })).is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_client_errors() {
        let client = AnalysisClient::new(AnalysisConfig::default());
        assert!(!client.is_configured());
        let issue = Issue {
            id: 1,
            title: "t".into(),
            description: "d".into(),
            status: "Open".into(),
            priority: "High".into(),
            assignee: "a".into(),
            created: String::new(),
            updated: String::new(),
            source: IssueSource::Redmine,
        };
        assert!(matches!(
            client.ask_similar_issues(&issue).await,
            Err(AnalysisError::NotConfigured)
        ));
    }
}
