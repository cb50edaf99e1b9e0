//! Routes for the append-only client status log under `/api/status`.
//!
//! - `POST`: `create::process` appends an entry for `{client_name}` and returns it.
//! - `GET`: `list::process` returns up to `list::MAX_STATUS_CHECKS` entries in
//!   insertion order.

mod create;
mod list;

use actix_web::web::{get, post, resource, scope};
use actix_web::Scope;

const API_PATH: &str = "/status";

pub fn configure_routes() -> Scope {
    scope(API_PATH).service(
        resource("")
            .route(post().to(create::process))
            .route(get().to(list::process)),
    )
}
