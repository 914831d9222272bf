//! Error types module
//!
//! All failures surfaced to HTTP callers are unified under the `AppError`
//! enum. Each variant carries its HTTP status, a machine-readable code, and a
//! log level so the API layer can render and log errors uniformly.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for auth failures and other recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Server configuration incomplete: {0}")]
    Configuration(String),

    #[error("Downloader timed out after {seconds}s")]
    ToolTimeout { seconds: u64 },

    #[error("Downloader failed (exit status {status:?}): {stderr}")]
    ToolFailed {
        status: Option<i32>,
        stderr: String,
    },

    #[error("Malformed downloader metadata: {0}")]
    MalformedMetadata(String),

    #[error("Download produced no output file")]
    NoArtifactProduced,

    #[error("Upload endpoint returned status {status}: {body}")]
    RelayFailed { status: u16, body: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedMetadata(err.to_string())
    }
}

impl AppError {
    /// HTTP status code to return for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Unauthorized(_) => 401,
            AppError::InvalidInput(_) => 400,
            AppError::Configuration(_)
            | AppError::ToolTimeout { .. }
            | AppError::ToolFailed { .. }
            | AppError::MalformedMetadata(_)
            | AppError::NoArtifactProduced
            | AppError::RelayFailed { .. }
            | AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "unauthorized",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Configuration(_) => "configuration",
            AppError::ToolTimeout { .. } => "tool_timeout",
            AppError::ToolFailed { .. } => "tool_failed",
            AppError::MalformedMetadata(_) => "malformed_metadata",
            AppError::NoArtifactProduced => "no_artifact",
            AppError::RelayFailed { .. } => "relay_failed",
            AppError::Internal(_) => "internal",
        }
    }

    /// Log level for this error.
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) => LogLevel::Debug,
            AppError::Unauthorized(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    /// Error type name for structured log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Configuration(_) => "Configuration",
            AppError::ToolTimeout { .. } => "ToolTimeout",
            AppError::ToolFailed { .. } => "ToolFailed",
            AppError::MalformedMetadata(_) => "MalformedMetadata",
            AppError::NoArtifactProduced => "NoArtifactProduced",
            AppError::RelayFailed { .. } => "RelayFailed",
            AppError::Internal(_) => "Internal",
        }
    }
}
