//! # Fundraising Retrieval Service
//!
//! Backend logic for `GET /api/fundraising`. Reads the singleton document from
//! the `fundraising_data` collection and returns it without the store's internal
//! identifier and `createdAt`. Bootstrap seeds the record at startup, so a
//! missing record only happens when the store was emptied behind our back.

use crate::app::state::AppState;
use crate::error::{ApiError, Result};
use crate::store::documents::fundraising_from_document;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::fundraising::FundraisingData;

/// Actix web handler for `GET /api/fundraising`.
///
/// # Returns
/// - `200 OK` with the `FundraisingData` as JSON.
/// - `404 Not Found` if no record exists.
pub async fn process(state: web::Data<AppState>) -> impl Responder {
    match get_fundraising_data(&state).await {
        Ok(data) => HttpResponse::Ok().json(data),
        Err(e) => e.error_response(),
    }
}

pub async fn get_fundraising_data(state: &AppState) -> Result<FundraisingData> {
    let doc = state
        .fundraising()
        .find_one()
        .await?
        .ok_or_else(|| ApiError::not_found("Fundraising data not found"))?;
    fundraising_from_document(doc)
}
