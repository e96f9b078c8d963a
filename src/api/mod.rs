pub mod error;
pub mod health;
pub mod issue;
pub mod migration;
pub mod openapi;

use actix_web::web;

/// Register every API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure)
        .configure(issue::configure)
        .configure(migration::configure)
        .configure(openapi::configure);
}
