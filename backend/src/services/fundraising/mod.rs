//! # Fundraising Service Module
//!
//! Routes for the singleton campaign record under `/api/fundraising`.
//!
//! ## Sub-modules:
//! - `get`: public read of the record.
//! - `update`: replacement of the record behind the admin secret.

mod get;
mod update;

use actix_web::web::{get, put, resource, scope};
use actix_web::Scope;

const API_PATH: &str = "/fundraising";

/// Configures the `Scope` for the fundraising record.
///
/// # Registered Routes:
///
/// *   **`GET`**: `get::process`, returns the record without store-internal fields.
/// *   **`PUT`**: `update::process`, expects every campaign field plus
///     `adminPassword` and overwrites the stored field set.
pub fn configure_routes() -> Scope {
    scope(API_PATH).service(
        resource("")
            .route(get().to(get::process))
            .route(put().to(update::process)),
    )
}
