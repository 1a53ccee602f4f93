//! Observability for tablegate
//!
//! Structured logging via `tracing`. The subscriber is installed once by
//! the CLI before anything else runs; library code only emits events.
//!
//! # Usage
//!
//! ```ignore
//! use tablegate::observability::{init_logging, LogFormat};
//!
//! init_logging(LogFormat::Json);
//! tracing::info!(port = 8787, "listening");
//! ```

mod logging;

pub use logging::{init_logging, LogFormat};
