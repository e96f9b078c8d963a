//! Issue lookup, similar-issue search and analysis orchestration

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{ExtractedQuery, Issue, IssueId, IssueIdError, IssueSource, SimilarIssue};
use crate::service::analysis::{self, AnalysisClient, AnalysisError};
use crate::service::migration;
use crate::tracker::{TrackerError, TrackerRegistry};

const MIN_KEYWORD_LEN: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum IssueServiceError {
    #[error(transparent)]
    InvalidId(#[from] IssueIdError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Everything the dashboard shows after "find RCA"
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisReport {
    pub issue: Issue,
    pub similar_issues: Vec<SimilarIssue>,
    pub migration: ExtractedQuery,
    pub generated_at: DateTime<Utc>,
}

/// Service coordinating trackers and the analysis collaborator
pub struct IssueService {
    trackers: TrackerRegistry,
    analysis: AnalysisClient,
}

impl IssueService {
    pub fn new(trackers: TrackerRegistry, analysis: AnalysisClient) -> Self {
        Self { trackers, analysis }
    }

    pub fn trackers(&self) -> &TrackerRegistry {
        &self.trackers
    }

    pub fn analysis(&self) -> &AnalysisClient {
        &self.analysis
    }

    /// Fetch issue details from the given tracker
    pub async fn get_issue(
        &self,
        source: IssueSource,
        raw_id: &str,
    ) -> Result<Issue, IssueServiceError> {
        let id: IssueId = raw_id.parse()?;
        let tracker = self.trackers.get(source)?;

        let issue = tracker.fetch_issue(id).await?;
        tracing::info!(issue_id = %id, source = %source, "Issue fetched");
        Ok(issue)
    }

    /// Search every configured tracker for issues resembling the given one
    ///
    /// A tracker that fails is logged and skipped so the others still
    /// contribute results.
    pub async fn similar_issues(
        &self,
        source: IssueSource,
        raw_id: &str,
    ) -> Result<Vec<SimilarIssue>, IssueServiceError> {
        let issue = self.get_issue(source, raw_id).await?;
        let Some(keyword) = search_keyword(&issue.title) else {
            tracing::debug!(issue_id = issue.id, "Issue title has no usable search keyword");
            return Ok(Vec::new());
        };

        let limit = self.trackers.search_limit();
        let mut results = Vec::new();
        for tracker in self.trackers.all() {
            results.push((tracker.source(), tracker.search(keyword, limit).await));
        }
        let similar = merge_similar(&issue, results);

        tracing::info!(
            issue_id = issue.id,
            keyword = %keyword,
            count = similar.len(),
            "Similar issue search completed"
        );
        Ok(similar)
    }

    /// Fetch the issue, ask the collaborator about it, and extract any
    /// migration query from the reply
    pub async fn analyze(
        &self,
        source: IssueSource,
        raw_id: &str,
    ) -> Result<AnalysisReport, IssueServiceError> {
        let issue = self.get_issue(source, raw_id).await?;
        let document = self.analysis.ask_similar_issues(&issue).await?;

        let similar_issues = analysis::parse_similar_issues(&document);
        let migration = migration::extract_migration_query(&document);

        tracing::info!(
            issue_id = issue.id,
            similar = similar_issues.len(),
            migration_found = migration.found,
            "Analysis completed"
        );

        Ok(AnalysisReport {
            issue,
            similar_issues,
            migration,
            generated_at: Utc::now(),
        })
    }
}

/// Combine per-tracker search results in tracker order
///
/// Failed searches are logged and skipped. The issue itself is dropped.
pub fn merge_similar(
    issue: &Issue,
    results: Vec<(IssueSource, Result<Vec<SimilarIssue>, TrackerError>)>,
) -> Vec<SimilarIssue> {
    let mut similar = Vec::new();

    for (source, result) in results {
        match result {
            Ok(found) => similar.extend(
                found
                    .into_iter()
                    .filter(|s| !(s.issue.id == issue.id && s.issue.source == issue.source)),
            ),
            Err(e) => {
                tracing::warn!(source = %source, error = %e, "Similar issue search failed");
            }
        }
    }

    similar
}

/// Pick the most specific word of a title to search by
///
/// The longest alphanumeric word wins; earlier words win ties.
pub fn search_keyword(title: &str) -> Option<&str> {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= MIN_KEYWORD_LEN)
        .fold(None::<&str>, |best, word| match best {
            Some(b) if b.chars().count() >= word.chars().count() => Some(b),
            _ => Some(word),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisConfig, TrackerConfig};

    fn unconfigured_service() -> IssueService {
        IssueService::new(
            TrackerRegistry::new(TrackerConfig::default()),
            AnalysisClient::new(AnalysisConfig::default()),
        )
    }

    #[test]
    fn test_search_keyword_longest_word() {
        assert_eq!(
            search_keyword("User login authentication error"),
            Some("authentication")
        );
        assert_eq!(search_keyword("Login fails"), Some("Login"));
    }

    #[test]
    fn test_search_keyword_ignores_punctuation_and_short_words() {
        assert_eq!(search_keyword("UI: a/b #42"), None);
        assert_eq!(search_keyword("DB: timeout!"), Some("timeout"));
    }

    fn issue(id: u64, source: IssueSource) -> Issue {
        Issue {
            id,
            title: format!("Issue {}", id),
            description: String::new(),
            status: "Open".into(),
            priority: "Normal".into(),
            assignee: "nobody".into(),
            created: String::new(),
            updated: String::new(),
            source,
        }
    }

    fn ids(similar: &[SimilarIssue]) -> Vec<(u64, IssueSource)> {
        similar.iter().map(|s| (s.issue.id, s.issue.source)).collect()
    }

    #[test]
    fn test_merge_similar_drops_the_issue_itself() {
        let target = issue(7, IssueSource::Redmine);
        let results = vec![
            (
                IssueSource::Redmine,
                Ok(vec![
                    issue(7, IssueSource::Redmine).into(),
                    issue(8, IssueSource::Redmine).into(),
                ]),
            ),
            (IssueSource::Mantis, Ok(vec![issue(7, IssueSource::Mantis).into()])),
        ];
        assert_eq!(
            ids(&merge_similar(&target, results)),
            vec![(8, IssueSource::Redmine), (7, IssueSource::Mantis)]
        );
    }

    #[test]
    fn test_merge_similar_skips_failed_tracker() {
        let target = issue(1, IssueSource::Redmine);
        let results = vec![
            (
                IssueSource::Redmine,
                Err(TrackerError::ParseError("bad body".into())),
            ),
            (IssueSource::Mantis, Ok(vec![issue(3, IssueSource::Mantis).into()])),
        ];
        assert_eq!(
            ids(&merge_similar(&target, results)),
            vec![(3, IssueSource::Mantis)]
        );
    }

    #[tokio::test]
    async fn test_invalid_id_rejected_before_tracker() {
        let service = unconfigured_service();
        let err = service.get_issue(IssueSource::Redmine, "12a").await.unwrap_err();
        assert!(matches!(err, IssueServiceError::InvalidId(IssueIdError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_unconfigured_tracker() {
        let service = unconfigured_service();
        let err = service.get_issue(IssueSource::Mantis, "5").await.unwrap_err();
        assert!(matches!(
            err,
            IssueServiceError::Tracker(TrackerError::NotConfigured(IssueSource::Mantis))
        ));
    }
}
