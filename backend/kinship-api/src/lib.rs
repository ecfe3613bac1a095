/// Kinship API Library
///
/// Backend of the Kinship social network: members, posts with likes and
/// comments, friend requests and direct chats.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and the route table
/// - `services`: Business logic (validation, authorization)
/// - `db`: Repositories over PostgreSQL and embedded migrations
/// - `models`: Row, request and response types
/// - `middleware`: Session authentication
/// - `security`: Password hashing and session tokens
/// - `pagination`: Page-number pagination envelope
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `logging`: Tracing subscriber setup
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod security;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;

use actix_cors::Cors;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{web, HttpRequest};
use config::CorsConfig;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}

/// Extractor configs plus every route. Callers add `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));
    handlers::configure_routes(cfg);
}

/// CORS policy for the configured origins. Credentials are only allowed for
/// an explicit origin list.
pub fn build_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if config.allow_any() {
        cors.allow_any_origin()
    } else {
        config
            .allowed_origins
            .iter()
            .fold(cors.supports_credentials(), |cors, origin| {
                cors.allowed_origin(origin)
            })
    }
}
