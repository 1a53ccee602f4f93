//! CLI module for tablegate
//!
//! Provides command-line interface for:
//! - serve: Boot the gateway and serve HTTP
//! - check: Validate configuration
//! - keys: List table bindings

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, keys, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_json, write_response};
