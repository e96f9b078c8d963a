pub mod analysis;
pub mod issue;
pub mod migration;

pub use analysis::AnalysisClient;
pub use issue::{AnalysisReport, IssueService};
pub use migration::extract_migration_query;
