use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry of the append-only client status log.
///
/// Entries are created by `POST /api/status` and are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCheck {
    /// UUID v4 generated by the backend when the entry is created.
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}
