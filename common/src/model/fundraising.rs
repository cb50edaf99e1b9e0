use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment details for the Monobank jar shown on the campaign page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonobankInfo {
    pub link: String,
    #[serde(rename = "cardNumber")]
    pub card_number: String,
    pub iban: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoInfo {
    pub usdt_trc20: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialInfo {
    pub instagram: String,
    pub facebook: String,
    /// Missing in the payload means an empty link; an explicit `null` is kept.
    #[serde(default = "default_telegram")]
    pub telegram: Option<String>,
}

fn default_telegram() -> Option<String> {
    Some(String::new())
}

/// The editable part of the fundraising record.
///
/// This is the field set an administrator submits on every update and the
/// field set that is overwritten as a whole in the store. The progress counters
/// carry no invariant: the goal may be below the amount raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub total_raised: f64,
    pub goal_amount: f64,
    pub donor_count: i64,
    pub monobank: MonobankInfo,
    pub crypto: CryptoInfo,
    pub social: SocialInfo,
}

/// The public view of the singleton fundraising record, as returned by
/// `GET /api/fundraising`.
///
/// Store-internal fields (the document identifier and `createdAt`) never
/// appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundraisingData {
    #[serde(flatten)]
    pub campaign: Campaign,
    #[serde(rename = "updatedAt", default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}
