//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::analysis::AnalysisError;
use crate::service::issue::IssueServiceError;
use crate::tracker::TrackerError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Issue not found (404)
    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    /// Bad request / validation error (400)
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Tracker or analysis collaborator failure (502)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Collaborator not configured (503)
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::IssueNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::IssueNotFound(_) => "issue_not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
            ApiError::ExternalService(_) => "external_service_error",
            ApiError::Unavailable(_) => "service_unavailable",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::NotFound(id) => ApiError::IssueNotFound(id),
            TrackerError::NotConfigured(source) => {
                ApiError::Unavailable(format!("{} tracker is not configured", source))
            }
            e @ (TrackerError::HttpError(_)
            | TrackerError::ParseError(_)
            | TrackerError::Unauthorized(_)
            | TrackerError::UnexpectedStatus { .. }) => ApiError::ExternalService(e.to_string()),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::NotConfigured => ApiError::Unavailable(err.to_string()),
            e => ApiError::ExternalService(e.to_string()),
        }
    }
}

impl From<IssueServiceError> for ApiError {
    fn from(err: IssueServiceError) -> Self {
        match err {
            IssueServiceError::InvalidId(e) => ApiError::BadRequest(e.to_string()),
            IssueServiceError::Tracker(e) => e.into(),
            IssueServiceError::Analysis(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IssueIdError, IssueSource};

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                IssueServiceError::InvalidId(IssueIdError::Missing).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                TrackerError::NotFound("42".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                TrackerError::NotConfigured(IssueSource::Mantis).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                TrackerError::ParseError("bad json".into()).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (AnalysisError::NotConfigured.into(), StatusCode::SERVICE_UNAVAILABLE),
            (
                ApiError::Internal("render failed".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AnalysisError::UnexpectedStatus {
                    status: 500,
                    body: String::new(),
                }
                .into(),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{error}");
        }
    }

    #[test]
    fn test_bad_request_message_is_user_facing() {
        let error: ApiError = IssueServiceError::InvalidId(IssueIdError::Missing).into();
        assert_eq!(error.to_string(), "Issue ID is required");
    }
}
