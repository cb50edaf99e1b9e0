use crate::app::state::AppState;
use crate::error::Result;
use crate::store::documents::status_from_document;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::status::StatusCheck;

/// Upper bound on the number of entries returned by one listing.
pub const MAX_STATUS_CHECKS: usize = 1000;

/// Actix web handler for `GET /api/status`.
pub async fn process(state: web::Data<AppState>) -> impl Responder {
    match list_status_checks(&state).await {
        Ok(checks) => HttpResponse::Ok().json(checks),
        Err(e) => e.error_response(),
    }
}

/// Returns the oldest `MAX_STATUS_CHECKS` entries, oldest first, with their
/// stored text timestamps parsed back.
pub async fn list_status_checks(state: &AppState) -> Result<Vec<StatusCheck>> {
    state
        .status_checks()
        .find(MAX_STATUS_CHECKS)
        .await?
        .into_iter()
        .map(status_from_document)
        .collect()
}
