//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod config_error;
pub mod error;
pub mod health;
pub mod letters;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod tickets;

use actix_web::web;

pub use error::ApiResult;

/// Largest accepted JSON body. A letter carries at most one base64 photo.
pub const JSON_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// JSON extractor settings shared by every endpoint.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(error::json_error_handler)
}

/// Query extractor settings shared by every endpoint.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(error::query_error_handler)
}
