//! tablegate - API-key gated table store over HTTP
//!
//! Each API key in a static registry is bound to one SQLite table. An
//! authenticated client can list, insert, and delete rows in its table;
//! an unauthenticated status endpoint reports host resources.

pub mod auth;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod status;
pub mod store;
