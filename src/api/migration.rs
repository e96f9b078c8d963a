//! Migration query extraction endpoint

use actix_web::{HttpResponse, post, web};
use serde_json::Value;

use crate::service::extract_migration_query;

/// Analysis replies can be large
const MAX_DOCUMENT_BYTES: usize = 2 * 1024 * 1024;

/// Extract a migration query from an analysis reply document
///
/// Accepts any JSON document. A reply without a usable query yields
/// `found: false` rather than an error.
#[utoipa::path(
    post,
    path = "/v1/migration-query/extract",
    responses(
        (status = 200, description = "Extraction completed", body = crate::model::ExtractedQuery),
        (status = 400, description = "Body is not valid JSON")
    ),
    tag = "migration"
)]
#[post("/v1/migration-query/extract")]
pub async fn extract(document: web::Json<Value>) -> HttpResponse {
    HttpResponse::Ok().json(extract_migration_query(&document))
}

/// Configure migration routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(MAX_DOCUMENT_BYTES))
        .service(extract);
}
