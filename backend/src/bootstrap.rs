//! Startup seeding of the fundraising record.

use crate::error::Result;
use crate::store::documents::{default_campaign, seed_document};
use crate::store::{Store, FUNDRAISING_DATA};
use chrono::Utc;
use log::{debug, info};

/// Inserts the default fundraising record when the store has none.
///
/// Returns `true` when a record was inserted. Running it against an already
/// initialised store leaves the existing record untouched.
pub async fn init_fundraising_data(store: &Store) -> Result<bool> {
    let collection = store.collection(FUNDRAISING_DATA);
    if collection.find_one().await?.is_some() {
        debug!("Fundraising data already present");
        return Ok(false);
    }

    let doc = seed_document(&default_campaign(), Utc::now())?;
    collection.insert_one(doc).await?;
    info!("Initialized default fundraising data");
    Ok(true)
}
