//! MantisBT REST tracker

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};

use super::{IssueTracker, TrackerError, check_status, http_client};
use crate::model::{Issue, IssueId, IssueSource, MantisConfig, MantisIssueList, SimilarIssue};

/// Mantis has no title search; this many recent issues are filtered locally
const SEARCH_PAGE_SIZE: usize = 100;

/// Client for a MantisBT instance
pub struct MantisTracker {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl MantisTracker {
    pub fn new(config: MantisConfig) -> Self {
        Self {
            client: http_client(),
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            api_token: config.api_token,
        }
    }

    fn issues_url(&self) -> String {
        format!("{}/api/rest/issues", self.base_url)
    }

    fn issue_url(&self, id: IssueId) -> String {
        format!("{}/{}", self.issues_url(), id)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(header::ACCEPT, "application/json");
        match &self.api_token {
            Some(token) => request.header(header::AUTHORIZATION, token),
            None => request,
        }
    }
}

/// Keep issues whose title contains the keyword, case-insensitively
fn filter_by_title(issues: Vec<SimilarIssue>, keyword: &str, limit: usize) -> Vec<SimilarIssue> {
    let needle = keyword.trim().to_lowercase();
    issues
        .into_iter()
        .filter(|s| needle.is_empty() || s.issue.title.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}

#[async_trait]
impl IssueTracker for MantisTracker {
    fn source(&self) -> IssueSource {
        IssueSource::Mantis
    }

    async fn fetch_issue(&self, id: IssueId) -> Result<Issue, TrackerError> {
        let url = self.issue_url(id);
        tracing::debug!(issue_id = %id, url = %url, "Fetching Mantis issue");

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = check_status(response, id.to_string())?;

        let body: MantisIssueList = response
            .json()
            .await
            .map_err(|e| TrackerError::ParseError(format!("Mantis issue {}: {}", id, e)))?;

        body.issues
            .iter()
            .find_map(|record| record.to_issue())
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<SimilarIssue>, TrackerError> {
        let url = self.issues_url();
        let page_size = SEARCH_PAGE_SIZE.to_string();

        tracing::debug!(keyword = %keyword, url = %url, "Searching Mantis issues");

        let request = self
            .client
            .get(&url)
            .query(&[("page_size", page_size.as_str()), ("page", "1")]);
        let response = self.authorized(request).send().await?;
        let response = check_status(response, keyword)?;

        let body: MantisIssueList = response
            .json()
            .await
            .map_err(|e| TrackerError::ParseError(format!("Mantis search: {}", e)))?;

        let candidates = body
            .issues
            .iter()
            .filter_map(|record| record.to_similar_issue())
            .collect();
        let issues = filter_by_title(candidates, keyword, limit);

        tracing::debug!(count = issues.len(), "Mantis search completed");
        Ok(issues)
    }
}
