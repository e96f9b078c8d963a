pub mod config;
pub mod issue;
pub mod mantis;
pub mod migration;
pub mod record;
pub mod redmine;

pub use config::{AnalysisConfig, Config, MantisConfig, RedmineConfig, TrackerConfig};
pub use issue::{Issue, IssueId, IssueIdError, IssueSource, SimilarIssue};
pub use mantis::{MantisIssueList, MantisRecord};
pub use migration::ExtractedQuery;
pub use record::SourceRecord;
pub use redmine::{RedmineIssueList, RedmineIssueResponse, RedmineRecord};
