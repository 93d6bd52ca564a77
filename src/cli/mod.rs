//! CLI module
//!
//! Provides command-line interface for:
//! - serve: load configuration and run the HTTP server
//! - check-config: validate configuration and print the effective values

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, DEFAULT_CONFIG_PATH};
pub use commands::{check_config, load_config, load_config_with_env, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_json, write_json_to};
