//! Shared handler state.

use std::sync::Arc;

use crate::auth::KeyRegistry;
use crate::status::StatusReporter;
use crate::store::TableStore;

/// Everything a handler needs, built once at startup.
///
/// The registry is read-only after construction; the store is a pool
/// handle and owns no rows itself.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<KeyRegistry>,
    pub store: TableStore,
    pub status: StatusReporter,
}

impl AppState {
    pub fn new(registry: KeyRegistry, store: TableStore, status: StatusReporter) -> Self {
        Self {
            registry: Arc::new(registry),
            store,
            status,
        }
    }
}
