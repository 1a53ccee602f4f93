//! # Tablegate Auth Module
//!
//! API-key authentication. Each key in the static registry is bound to
//! exactly one table; a request authenticates by presenting the key as a
//! bearer token and is then confined to that table.

pub mod authenticator;
pub mod errors;
pub mod registry;

pub use authenticator::{authenticate, extract_bearer_token, TableBinding};
pub use errors::{AuthError, AuthResult};
pub use registry::{mask_key, ApiKeyEntry, KeyRegistry, TableName};
