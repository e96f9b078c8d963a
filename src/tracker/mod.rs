//! Issue tracker clients for fetching and searching issues

mod mantis;
mod redmine;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};

use crate::model::{Issue, IssueId, IssueSource, SimilarIssue, TrackerConfig};

pub use mantis::MantisTracker;
pub use redmine::RedmineTracker;

const USER_AGENT: &str = concat!("issue-lens/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Issue not found: {0}")]
    NotFound(String),

    #[error("Tracker rejected credentials ({0})")]
    Unauthorized(StatusCode),

    #[error("Unexpected status {status}: {url}")]
    UnexpectedStatus { status: StatusCode, url: String },

    #[error("Tracker not configured: {0}")]
    NotConfigured(IssueSource),
}

/// Trait for issue tracker backends
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// The tracker this client talks to
    fn source(&self) -> IssueSource;

    /// Fetch a single issue by id
    async fn fetch_issue(&self, id: IssueId) -> Result<Issue, TrackerError>;

    /// Find issues whose title matches a keyword
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<SimilarIssue>, TrackerError>;
}

/// Build a reqwest client with the service user agent
fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Map non-success statuses onto tracker errors
fn check_status(response: Response, not_found: impl Into<String>) -> Result<Response, TrackerError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(TrackerError::NotFound(not_found.into()));
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::warn!(url = %response.url(), status = %status, "Tracker rejected credentials");
        return Err(TrackerError::Unauthorized(status));
    }

    if !status.is_success() {
        return Err(TrackerError::UnexpectedStatus {
            status,
            url: response.url().to_string(),
        });
    }

    Ok(response)
}

/// Registry of the configured trackers
pub struct TrackerRegistry {
    redmine: Option<RedmineTracker>,
    mantis: Option<MantisTracker>,
    search_limit: usize,
}

impl TrackerRegistry {
    pub fn new(config: TrackerConfig) -> Self {
        let redmine = config.redmine.map(|c| {
            tracing::info!(base_url = %c.base_url, "Redmine tracker configured");
            RedmineTracker::new(c)
        });
        let mantis = config.mantis.map(|c| {
            tracing::info!(base_url = %c.base_url, "Mantis tracker configured");
            MantisTracker::new(c)
        });

        if redmine.is_none() && mantis.is_none() {
            tracing::warn!("No issue trackers configured");
        }

        Self {
            redmine,
            mantis,
            search_limit: config.search_limit,
        }
    }

    /// Resolve the tracker for a source
    pub fn get(&self, source: IssueSource) -> Result<&dyn IssueTracker, TrackerError> {
        let tracker: Option<&dyn IssueTracker> = match source {
            IssueSource::Redmine => self.redmine.as_ref().map(|t| t as &dyn IssueTracker),
            IssueSource::Mantis => self.mantis.as_ref().map(|t| t as &dyn IssueTracker),
        };
        tracker.ok_or(TrackerError::NotConfigured(source))
    }

    /// Configured trackers, Redmine first
    pub fn all(&self) -> Vec<&dyn IssueTracker> {
        let mut trackers: Vec<&dyn IssueTracker> = Vec::new();
        if let Some(redmine) = &self.redmine {
            trackers.push(redmine);
        }
        if let Some(mantis) = &self.mantis {
            trackers.push(mantis);
        }
        trackers
    }

    pub fn is_configured(&self, source: IssueSource) -> bool {
        self.get(source).is_ok()
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit
    }
}
