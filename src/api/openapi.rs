//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::error::ApiError;
use crate::api::{error, health, issue, migration};

/// OpenAPI document for the service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Issue Lens API",
        description = "Issue lookup, similar-issue analysis and migration query extraction"
    ),
    paths(
        issue::get_issue,
        issue::get_similar_issues,
        issue::analyze_issue,
        migration::extract,
        health::liveness,
        health::readiness
    ),
    components(schemas(
        crate::model::Issue,
        crate::model::IssueSource,
        crate::model::SimilarIssue,
        crate::model::ExtractedQuery,
        crate::service::AnalysisReport,
        error::ErrorResponse,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth
    )),
    tags(
        (name = "issues", description = "Issue lookup and analysis"),
        (name = "migration", description = "Migration query extraction"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> Result<HttpResponse, ApiError> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(|e| ApiError::Internal(format!("Failed to render OpenAPI YAML: {}", e)))?;
    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
