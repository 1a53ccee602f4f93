//! # Tablegate Store Module
//!
//! Per-key table storage on SQLite.

mod errors;
mod table_store;

pub use errors::{StoreError, StoreResult};
pub use table_store::{FetchAll, Row, TableStore};
