//! REST API endpoints for issue lookup and analysis

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::error::ApiError;
use crate::model::IssueSource;
use crate::service::IssueService;

/// Query parameters selecting the tracker
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SourceParams {
    /// Tracker holding the issue (redmine, mantis; default: redmine)
    pub source: Option<IssueSource>,
}

impl SourceParams {
    fn source(&self) -> IssueSource {
        self.source.unwrap_or_default()
    }
}

/// Get issue details by ID
#[utoipa::path(
    get,
    path = "/v1/issues/{id}",
    params(
        ("id" = String, Path, description = "Positive numeric issue ID"),
        SourceParams
    ),
    responses(
        (status = 200, description = "Issue retrieved successfully", body = crate::model::Issue),
        (status = 400, description = "Invalid issue ID", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Issue not found", body = crate::api::error::ErrorResponse),
        (status = 502, description = "Tracker request failed", body = crate::api::error::ErrorResponse),
        (status = 503, description = "Tracker not configured", body = crate::api::error::ErrorResponse)
    ),
    tag = "issues"
)]
#[get("/v1/issues/{id}")]
pub async fn get_issue(
    service: web::Data<IssueService>,
    path: web::Path<String>,
    query: web::Query<SourceParams>,
) -> Result<HttpResponse, ApiError> {
    let issue = service.get_issue(query.source(), &path).await?;
    Ok(HttpResponse::Ok().json(issue))
}

/// Search the configured trackers for issues similar to the given one
#[utoipa::path(
    get,
    path = "/v1/issues/{id}/similar",
    params(
        ("id" = String, Path, description = "Positive numeric issue ID"),
        SourceParams
    ),
    responses(
        (status = 200, description = "Similar issues found", body = Vec<crate::model::SimilarIssue>),
        (status = 400, description = "Invalid issue ID", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Issue not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "issues"
)]
#[get("/v1/issues/{id}/similar")]
pub async fn get_similar_issues(
    service: web::Data<IssueService>,
    path: web::Path<String>,
    query: web::Query<SourceParams>,
) -> Result<HttpResponse, ApiError> {
    let similar = service.similar_issues(query.source(), &path).await?;
    Ok(HttpResponse::Ok().json(similar))
}

/// Ask the analysis collaborator about an issue
///
/// Returns the normalized similar issues from the reply together with any
/// migration query found in it.
#[utoipa::path(
    post,
    path = "/v1/issues/{id}/analysis",
    params(
        ("id" = String, Path, description = "Positive numeric issue ID"),
        SourceParams
    ),
    responses(
        (status = 200, description = "Analysis completed", body = crate::service::AnalysisReport),
        (status = 400, description = "Invalid issue ID", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Issue not found", body = crate::api::error::ErrorResponse),
        (status = 502, description = "Analysis request failed", body = crate::api::error::ErrorResponse),
        (status = 503, description = "Analysis not configured", body = crate::api::error::ErrorResponse)
    ),
    tag = "issues"
)]
#[post("/v1/issues/{id}/analysis")]
pub async fn analyze_issue(
    service: web::Data<IssueService>,
    path: web::Path<String>,
    query: web::Query<SourceParams>,
) -> Result<HttpResponse, ApiError> {
    let report = service.analyze(query.source(), &path).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Configure issue routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_issue)
        .service(get_similar_issues)
        .service(analyze_issue);
}
