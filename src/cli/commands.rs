//! CLI command implementations
//!
//! Configuration precedence, lowest to highest: built-in defaults, JSON
//! config file, environment (`PORT`, `REQUIRE_AUTH`, `API_KEY`), command-line
//! flags.

use std::fs;
use std::path::Path;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{log_event_with_fields, Event};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Load configuration from `path` (if it exists) and the process environment
pub fn load_config(path: &Path) -> CliResult<HttpServerConfig> {
    load_config_with_env(path, |name| std::env::var(name).ok())
}

/// Load configuration using `lookup` for environment variables
pub fn load_config_with_env<F>(path: &Path, lookup: F) -> CliResult<HttpServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_file(path, format!("Failed to read config: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| CliError::config_file(path, format!("Invalid config JSON: {}", e)))?
    } else {
        HttpServerConfig::default()
    };

    config.apply_env(lookup)?;
    Ok(config)
}

/// Start the HTTP server
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }
    validate(&config, config_path)?;

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("path", &config_path.display().to_string()),
            ("port", &config.port.to_string()),
        ],
    );

    let server = HttpServer::with_config(config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

fn boot_failed(message: String) -> CliError {
    log_event_with_fields(Event::BootFailed, &[("reason", &message)]);
    CliError::boot_failed(message)
}

fn validate(config: &HttpServerConfig, path: &Path) -> CliResult<()> {
    config
        .validate()
        .map_err(|e| CliError::from(e).with_config_path(path))
}

/// Validate configuration and print it with secrets masked
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    validate(&config, config_path)?;
    write_json(&config.redacted())
}
