use actix_web::web;

use crate::error::AppError;

pub mod accounts;
pub mod health;
pub mod public;

/// Register every API route.
///
/// `main.rs` wraps these in the tracing, logging and CORS middleware; tests
/// register them directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Unparseable query strings get the JSON error body too
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::bad_request("invalid_request", err.to_string()).into()
    }))
    .configure(public::configure_routes)
    .configure(accounts::configure_routes)
    .configure(health::configure_routes);
}
