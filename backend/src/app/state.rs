//! Process-scoped resources shared by every request handler.
//!
//! `AppState` is built once in `main.rs` after configuration is loaded and the
//! store is opened, and handed to the Actix application as `web::Data`. Handlers
//! receive it as an explicit extractor argument; there are no global resources.

use crate::config::Settings;
use crate::store::{Collection, Store, FUNDRAISING_DATA, STATUS_CHECKS};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Handle to the document store; clones share one connection.
    pub store: Store,
    /// Settings loaded at startup. Only the admin secret is read per request.
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Store, settings: Settings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }

    pub fn fundraising(&self) -> Collection {
        self.store.collection(FUNDRAISING_DATA)
    }

    pub fn status_checks(&self) -> Collection {
        self.store.collection(STATUS_CHECKS)
    }
}
