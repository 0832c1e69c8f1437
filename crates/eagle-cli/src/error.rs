//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use eagle_config::ConfigError;
use eagle_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the sensor: {reason}")]
    #[diagnostic(
        code(eagle::connection_failed),
        help(
            "Check that the device is powered and on the network.\n\
             Set the address with --address / --port, or run: eagle config set --address <ip>"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device command failed: {message}")]
    #[diagnostic(
        code(eagle::device_error),
        help("The sensor answered but did not report readings. Retry in a few seconds.")
    )]
    DeviceError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(eagle::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(eagle::config),
        help("Check the config file shown by: eagle config path")
    )]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(eagle::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoCommLink { reason } => CliError::ConnectionFailed { reason },
            CoreError::NotConnected => CliError::ConnectionFailed {
                reason: "session is not connected".into(),
            },
            CoreError::CommandFailed { message } => CliError::DeviceError { message },
            CoreError::Config { message } => CliError::Validation {
                field: "address".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
