//! # HTTP Services
//!
//! All endpoints live under the `/api` root:
//!
//! - `GET  /api/`: greeting, used as a health check.
//! - `GET  /api/fundraising`: public read of the campaign record.
//! - `PUT  /api/fundraising`: password-protected replacement of the campaign record.
//! - `POST /api/status`: append a client status entry.
//! - `GET  /api/status`: list status entries in insertion order.

/// Builds a test service around the given `AppState`, wired the same way as in `main.rs`.
#[cfg(test)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(crate::services::json_config())
                .app_data(actix_web::web::Data::new($state))
                .service(crate::services::configure_routes()),
        )
        .await
    };
}

pub mod auth;
mod fundraising;
mod root;
mod status;

use crate::error::ApiError;
use actix_web::web::{self, get, scope};
use actix_web::Scope;

/// The base path for every API endpoint.
const API_PATH: &str = "/api";

/// Maximum accepted JSON body size.
const JSON_LIMIT: usize = 64 * 1024;

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/", get().to(root::process))
        .service(fundraising::configure_routes())
        .service(status::configure_routes())
}

/// JSON extractor configuration shared by every endpoint.
///
/// Bodies that fail to deserialize are answered with `422 Unprocessable Entity`
/// before any handler runs.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| ApiError::validation(err.to_string()).into())
}
