//! Health check endpoints for liveness and readiness probes

use actix_web::{HttpResponse, Responder, get, web};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::IssueSource;
use crate::service::IssueService;

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub dependencies: DependencyHealth,
}

#[derive(Serialize, ToSchema)]
pub struct DependencyHealth {
    pub redmine: String,
    pub mantis: String,
    pub analysis: String,
}

fn configured(flag: bool) -> String {
    let state = if flag { "configured" } else { "disabled" };
    state.to_string()
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness probe endpoint
///
/// Ready once at least one issue tracker is configured. The analysis
/// collaborator is optional; without it only lookups and searches work.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus),
        (status = 503, description = "Service is not ready", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(service: web::Data<IssueService>) -> impl Responder {
    let trackers = service.trackers();
    let redmine = trackers.is_configured(IssueSource::Redmine);
    let mantis = trackers.is_configured(IssueSource::Mantis);
    let ready = redmine || mantis;

    if !ready {
        tracing::warn!("Readiness check failed: no issue tracker configured");
    }

    let status = ReadinessStatus {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: DependencyHealth {
            redmine: configured(redmine),
            mantis: configured(mantis),
            analysis: configured(service.analysis().is_configured()),
        },
    };

    if ready {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::ServiceUnavailable().json(status)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}
