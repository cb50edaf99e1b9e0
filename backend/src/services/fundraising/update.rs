//! # Fundraising Update Service
//!
//! Backend logic for `PUT /api/fundraising`.
//!
//! ## Workflow
//!
//! 1.  The body is read as a plain JSON object so the admin secret can be checked
//!     before the rest of the payload is validated. A wrong secret is therefore
//!     rejected with `401` even when the campaign fields are malformed.
//! 2.  No configured secret yields `500`; a missing or mismatching
//!     `adminPassword` yields `401` (see `services::auth`).
//! 3.  The remaining payload is decoded into a `FundraisingUpdate`; failures are
//!     `422`.
//! 4.  Every campaign field and a fresh `updatedAt` are set on the stored record.
//!     The record is never created here. If no record matched, the update is
//!     reported as a `500`.
//!
//! Concurrent updates are last-write-wins.

use crate::app::state::AppState;
use crate::error::{ApiError, Result};
use crate::services::auth::verify_admin_password;
use crate::store::documents::update_fields;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use common::requests::{AppliedUpdate, FundraisingUpdate, UpdateResponse};
use log::{debug, info};
use serde_json::{Map, Value};

/// Confirmation message shown by the admin page after a successful update.
const UPDATE_MESSAGE: &str = "Дані успішно оновлено";

/// Actix web handler for `PUT /api/fundraising`.
///
/// # Returns
/// - `200 OK` with an `UpdateResponse` echoing the applied fields.
/// - `401 Unauthorized` if `adminPassword` does not match.
/// - `422 Unprocessable Entity` if the payload is incomplete.
/// - `500 Internal Server Error` if no secret is configured or nothing was updated.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<Map<String, Value>>,
) -> impl Responder {
    match update_fundraising_data(&state, payload.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.error_response(),
    }
}

pub async fn update_fundraising_data(
    state: &AppState,
    payload: Map<String, Value>,
) -> Result<UpdateResponse> {
    let provided = payload
        .get("adminPassword")
        .and_then(Value::as_str)
        .unwrap_or_default();
    verify_admin_password(state.settings.admin_password.as_deref(), provided)?;

    let update: FundraisingUpdate = serde_json::from_value(Value::Object(payload))
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let applied = AppliedUpdate {
        campaign: update.campaign,
        updated_at: Utc::now(),
    };
    let result = state
        .fundraising()
        .update_one(update_fields(&applied)?)
        .await?;
    if result.matched == 0 {
        return Err(ApiError::server("Failed to update data"));
    }
    if result.modified == 0 {
        debug!("Fundraising update left the stored record unchanged");
    }

    info!(
        "Fundraising data updated: raised {} of {} from {} donors",
        applied.campaign.total_raised, applied.campaign.goal_amount, applied.campaign.donor_count
    );
    Ok(UpdateResponse {
        success: true,
        message: UPDATE_MESSAGE.to_string(),
        data: applied,
    })
}
