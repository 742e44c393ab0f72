pub mod config;
pub mod database;
pub mod entities;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod swagger;
pub mod test_utils;
pub mod utils;

pub use config::Config;
pub use error::{AppError, AppResult};

use actix_web::{ResponseError, error::InternalError, web};

/// Body, query and path extraction failures answer with the standard
/// validation envelope.
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, AppError::ValidationError(message).error_response())
            .into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, AppError::ValidationError(message).error_response())
            .into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, AppError::NotFound(message).error_response()).into()
    }));
}

/// Every route: `/health` at the root, the REST API under `/api`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health)).service(
        web::scope("/api")
            .configure(handlers::menu_config)
            .configure(handlers::order_config)
            .configure(handlers::auth_config)
            .configure(handlers::admin_config),
    );
}
