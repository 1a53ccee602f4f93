//! CLI argument definitions using clap
//!
//! Commands:
//! - tablegate serve --config <path> [--host <host>] [--port <port>]
//! - tablegate check --config <path>
//! - tablegate keys --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tablegate - API-key gated table store over HTTP
#[derive(Parser, Debug)]
#[command(name = "tablegate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP gateway
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./tablegate.json")]
        config: PathBuf,

        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate configuration and the API key file, then exit
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./tablegate.json")]
        config: PathBuf,
    },

    /// List table bindings with masked keys
    Keys {
        /// Path to configuration file
        #[arg(long, default_value = "./tablegate.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
