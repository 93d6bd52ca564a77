//! CLI argument definitions using clap
//!
//! Commands:
//! - scim-import serve [--config <path>] [--port <port>]
//! - scim-import check-config [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "./scim-import.json";

/// SCIM Import Service - SCIM 2.0 user provisioning and webhook ingestion
#[derive(Parser, Debug)]
#[command(name = "scim-import")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file (defaults apply when missing)
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Port override, wins over file and environment
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate configuration, then print it
    CheckConfig {
        /// Path to configuration file (defaults apply when missing)
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
