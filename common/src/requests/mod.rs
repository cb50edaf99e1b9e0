use crate::model::fundraising::Campaign;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request payload for `PUT /api/fundraising`.
///
/// Carries the complete replacement field set together with the shared admin
/// secret. The secret is checked and then discarded; it is never stored.
#[derive(Deserialize)]
pub struct FundraisingUpdate {
    #[serde(rename = "adminPassword")]
    pub admin_password: String,
    #[serde(flatten)]
    pub campaign: Campaign,
}

/// Request payload for `POST /api/status`.
#[derive(Debug, Deserialize, Serialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

/// The field set actually written by an update, echoed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedUpdate {
    #[serde(flatten)]
    pub campaign: Campaign,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Response body of a successful `PUT /api/fundraising`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
    pub data: AppliedUpdate,
}

/// Greeting returned by `GET /api/`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fundraising_update_splits_secret_from_fields() {
        let update: FundraisingUpdate = serde_json::from_str(
            r#"{
                "adminPassword": "admin123",
                "totalRaised": 150000,
                "goalAmount": 600000,
                "donorCount": 400,
                "monobank": {"link": "l", "cardNumber": "c", "iban": "i"},
                "crypto": {"usdt_trc20": "t"},
                "social": {"instagram": "i", "facebook": "f", "telegram": "tg"}
            }"#,
        )
        .unwrap();
        assert_eq!(update.admin_password, "admin123");
        assert_eq!(update.campaign.donor_count, 400);
        assert_eq!(update.campaign.social.telegram.as_deref(), Some("tg"));
    }

    #[test]
    fn fundraising_update_requires_secret() {
        let result: Result<FundraisingUpdate, _> = serde_json::from_str(
            r#"{
                "totalRaised": 1,
                "goalAmount": 2,
                "donorCount": 3,
                "monobank": {"link": "l", "cardNumber": "c", "iban": "i"},
                "crypto": {"usdt_trc20": "t"},
                "social": {"instagram": "i", "facebook": "f"}
            }"#,
        );
        assert!(result.is_err());
    }
}
