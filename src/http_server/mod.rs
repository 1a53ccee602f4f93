//! # Tablegate HTTP Server Module
//!
//! Axum router and server for the gateway.
//!
//! # Endpoints
//!
//! - `/` and `/favicon.ico` - Static assets
//! - `/health` - Liveness check
//! - `/api/db` - Bearer-authenticated table CRUD
//! - `/api/status` - Host status snapshot

pub mod config;
pub mod db_routes;
pub mod errors;
pub mod server;
pub mod state;
pub mod status_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, MessageResponse};
pub use server::{build_router, HttpServer};
pub use state::AppState;
