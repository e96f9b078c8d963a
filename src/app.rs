//! Application state and service initialization
//!
//! This module centralizes service construction so that `main` and tests
//! build the same dependency graph.

use actix_web::web;

use crate::model::Config;
use crate::service::{AnalysisClient, IssueService};
use crate::tracker::TrackerRegistry;

/// Application state containing all services
pub struct AppState {
    /// Issue lookup and analysis service
    pub issue_service: web::Data<IssueService>,
}

impl AppState {
    /// Build application state from configuration
    pub fn new(config: Config) -> Result<Self, AppError> {
        if config.analysis.timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "analysis.timeout_secs must be greater than zero",
            ));
        }

        let trackers = TrackerRegistry::new(config.trackers);
        let analysis = AnalysisClient::new(config.analysis);

        Ok(Self {
            issue_service: web::Data::new(IssueService::new(trackers, analysis)),
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
