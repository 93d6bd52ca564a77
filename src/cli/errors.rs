//! CLI error types
//!
//! Every CLI error ends the process. The error code picks the exit status.

use std::fmt;
use std::io;
use std::path::Path;

use crate::http_server::ConfigError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Config file unreadable or invalid, bad environment value, or
    /// settings that fail validation
    ConfigError,
    /// Writing command output failed
    IoError,
    /// Runtime or listener could not start
    BootFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SCIM_CLI_CONFIG_ERROR",
            Self::IoError => "SCIM_CLI_IO_ERROR",
            Self::BootFailed => "SCIM_CLI_BOOT_FAILED",
        }
    }

    /// Process exit status (sysexits.h values)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigError => 78,
            Self::IoError => 74,
            Self::BootFailed => 69,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    /// Config file the error relates to, when known
    config_path: Option<String>,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            config_path: None,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Config error attributed to the file at `path`
    pub fn config_file(path: &Path, msg: impl Into<String>) -> Self {
        Self::config_error(msg).with_config_path(path)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn with_config_path(mut self, path: &Path) -> Self {
        self.config_path = Some(path.display().to_string());
        self
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn config_path(&self) -> Option<&str> {
        self.config_path.as_deref()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.config_path {
            Some(path) => write!(f, "{}: {} ({})", self.code.code(), self.message, path),
            None => write!(f, "{}: {}", self.code.code(), self.message),
        }
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON output failed: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
