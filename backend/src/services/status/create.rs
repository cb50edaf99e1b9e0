use crate::app::state::AppState;
use crate::error::Result;
use crate::store::documents::{new_status_check, status_to_document};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::status::StatusCheck;
use common::requests::StatusCheckCreate;
use log::debug;

/// Actix web handler for `POST /api/status`.
///
/// A body without `client_name` never reaches this handler; the JSON extractor
/// answers it with `422`.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<StatusCheckCreate>,
) -> impl Responder {
    match create_status_check(&state, payload.into_inner()).await {
        Ok(check) => HttpResponse::Ok().json(check),
        Err(e) => e.error_response(),
    }
}

pub async fn create_status_check(state: &AppState, input: StatusCheckCreate) -> Result<StatusCheck> {
    let check = new_status_check(input.client_name);
    state
        .status_checks()
        .insert_one(status_to_document(&check))
        .await?;
    debug!("Recorded status check {} for {}", check.id, check.client_name);
    Ok(check)
}
