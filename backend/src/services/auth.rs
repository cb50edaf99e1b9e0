//! Admin secret check guarding writes to the fundraising record.

use crate::error::{ApiError, Result};
use log::warn;
use subtle::ConstantTimeEq;

/// Verifies the secret presented by the caller against the configured one.
///
/// Fails with a configuration error when no secret is configured, whatever the
/// caller sent. The comparison runs in constant time with respect to the
/// secret's contents.
pub fn verify_admin_password(configured: Option<&str>, provided: &str) -> Result<()> {
    let Some(expected) = configured else {
        return Err(ApiError::configuration("Admin password not configured"));
    };

    if bool::from(expected.as_bytes().ct_eq(provided.as_bytes())) {
        Ok(())
    } else {
        warn!("Rejected fundraising update with an invalid admin password");
        Err(ApiError::unauthorized("Invalid admin password"))
    }
}
