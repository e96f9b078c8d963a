//! Redmine REST tracker

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};

use super::{IssueTracker, TrackerError, check_status, http_client};
use crate::model::{
    Issue, IssueId, IssueSource, RedmineConfig, RedmineIssueList, RedmineIssueResponse,
    SimilarIssue,
};

const API_KEY_HEADER: &str = "X-Redmine-API-Key";

/// Client for a Redmine instance
pub struct RedmineTracker {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RedmineTracker {
    pub fn new(config: RedmineConfig) -> Self {
        Self {
            client: http_client(),
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key,
        }
    }

    fn issue_url(&self, id: IssueId) -> String {
        format!("{}/issues/{}.json", self.base_url, id)
    }

    fn search_url(&self) -> String {
        format!("{}/issues.json", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(header::ACCEPT, "application/json");
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }
}

#[async_trait]
impl IssueTracker for RedmineTracker {
    fn source(&self) -> IssueSource {
        IssueSource::Redmine
    }

    async fn fetch_issue(&self, id: IssueId) -> Result<Issue, TrackerError> {
        let url = self.issue_url(id);
        tracing::debug!(issue_id = %id, url = %url, "Fetching Redmine issue");

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = check_status(response, id.to_string())?;

        let body: RedmineIssueResponse = response
            .json()
            .await
            .map_err(|e| TrackerError::ParseError(format!("Redmine issue {}: {}", id, e)))?;

        body.issue
            .to_issue()
            .ok_or_else(|| TrackerError::ParseError(format!("Redmine issue {} has no id", id)))
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<SimilarIssue>, TrackerError> {
        let url = self.search_url();
        // Redmine's `~` operator means "contains"
        let subject = format!("~{}", keyword);
        let limit = limit.to_string();

        tracing::debug!(keyword = %keyword, url = %url, "Searching Redmine issues");

        let request = self
            .client
            .get(&url)
            .query(&[("subject", subject.as_str()), ("limit", limit.as_str())]);
        let response = self.authorized(request).send().await?;
        let response = check_status(response, keyword)?;

        let body: RedmineIssueList = response
            .json()
            .await
            .map_err(|e| TrackerError::ParseError(format!("Redmine search: {}", e)))?;

        let issues: Vec<SimilarIssue> = body
            .issues
            .iter()
            .filter_map(|record| record.to_similar_issue())
            .collect();

        tracing::debug!(count = issues.len(), "Redmine search completed");
        Ok(issues)
    }
}
