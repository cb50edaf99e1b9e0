//! Mapping between the wire models in `common` and the documents kept in the store.
//!
//! The fundraising record keeps its timestamps in chrono's native serde form.
//! Status checks store their timestamp as RFC 3339 text with full sub-second
//! precision and are parsed back on read, so the value round-trips exactly.

use crate::error::{ApiError, Result};
use crate::store::Document;
use chrono::{DateTime, SecondsFormat, Utc};
use common::model::fundraising::{
    Campaign, CryptoInfo, FundraisingData, MonobankInfo, SocialInfo,
};
use common::model::status::StatusCheck;
use common::requests::AppliedUpdate;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Field holding the creation time of the fundraising record. Never returned.
pub const CREATED_AT: &str = "createdAt";

pub const UPDATED_AT: &str = "updatedAt";

/// Campaign values used when the store holds no fundraising record yet.
pub fn default_campaign() -> Campaign {
    Campaign {
        total_raised: 125_000.0,
        goal_amount: 500_000.0,
        donor_count: 347,
        monobank: MonobankInfo {
            link: "https://send.monobank.ua/jar/4g2vud36xP".to_string(),
            card_number: "5375 4141 0123 4567".to_string(),
            iban: "UA123456789012345678901234567".to_string(),
        },
        crypto: CryptoInfo {
            usdt_trc20: "TXqwertyuiopasdfghjklzxcvbnm123456".to_string(),
        },
        social: SocialInfo {
            instagram: "https://instagram.com/unit406".to_string(),
            facebook: "https://facebook.com/unit406".to_string(),
            telegram: Some(String::new()),
        },
    }
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::server(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Builds the initial fundraising document, stamped with `now` as both its
/// creation and update time.
pub fn seed_document(campaign: &Campaign, now: DateTime<Utc>) -> Result<Map<String, Value>> {
    let mut doc = to_object(campaign)?;
    doc.insert(UPDATED_AT.to_string(), serde_json::to_value(now)?);
    doc.insert(CREATED_AT.to_string(), serde_json::to_value(now)?);
    Ok(doc)
}

/// Builds the field set written by an update: every campaign field plus the
/// new `updatedAt`.
pub fn update_fields(applied: &AppliedUpdate) -> Result<Map<String, Value>> {
    to_object(applied)
}

/// Decodes the stored fundraising document, dropping store-internal fields.
pub fn fundraising_from_document(doc: Document) -> Result<FundraisingData> {
    let mut body = doc.body;
    body.remove("_id");
    body.remove(CREATED_AT);
    Ok(serde_json::from_value(Value::Object(body))?)
}

/// Creates a new status entry with a fresh identifier and the current time.
pub fn new_status_check(client_name: String) -> StatusCheck {
    StatusCheck {
        id: Uuid::new_v4().to_string(),
        client_name,
        timestamp: Utc::now(),
    }
}

pub fn status_to_document(check: &StatusCheck) -> Map<String, Value> {
    let mut doc = Map::new();
    doc.insert("id".to_string(), Value::String(check.id.clone()));
    doc.insert(
        "client_name".to_string(),
        Value::String(check.client_name.clone()),
    );
    doc.insert(
        "timestamp".to_string(),
        Value::String(check.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
    );
    doc
}

/// Decodes a stored status entry, parsing its text timestamp back.
pub fn status_from_document(doc: Document) -> Result<StatusCheck> {
    let field = |name: &str| -> Result<String> {
        doc.body
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::server(format!("status check {} is missing '{}'", doc.id, name))
            })
    };

    let timestamp = DateTime::parse_from_rfc3339(&field("timestamp")?)?.with_timezone(&Utc);
    Ok(StatusCheck {
        id: field("id")?,
        client_name: field("client_name")?,
        timestamp,
    })
}
