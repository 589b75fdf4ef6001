//! Error types and exit codes for tagrank
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (IO, provider, interrupted run)
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (missing config, missing tag, missing destination page)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes reported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing config, tag, or destination (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for TagrankError {
    fn from(err: rusqlite::Error) -> Self {
        TagrankError::Other(err.to_string())
    }
}

/// Errors that can occur during tagrank operations
#[derive(Error, Debug)]
pub enum TagrankError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    // Data errors (exit code 3)
    #[error("config not found at {path:?} (run `tagrank init` first)")]
    ConfigNotFound { path: PathBuf },

    #[error("tag not found: {tag}")]
    TagNotFound { tag: String },

    #[error("destination page not found: {name} (create it in the client first)")]
    DestinationNotFound { name: String },

    // Generic failures (exit code 1)
    #[error("provider error during {operation}: {reason}")]
    Provider { operation: String, reason: String },

    #[error("ranking interrupted before all tags were scored")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl TagrankError {
    /// Create an error for a failed provider call
    pub fn provider(operation: &str, reason: impl std::fmt::Display) -> Self {
        TagrankError::Provider {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            TagrankError::UnknownFormat(_) | TagrankError::UsageError(_) => ExitCode::Usage,

            TagrankError::ConfigNotFound { .. }
            | TagrankError::TagNotFound { .. }
            | TagrankError::DestinationNotFound { .. } => ExitCode::Data,

            TagrankError::Provider { .. }
            | TagrankError::Interrupted
            | TagrankError::Io(_)
            | TagrankError::Json(_)
            | TagrankError::Toml(_)
            | TagrankError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            TagrankError::UnknownFormat(_) => "unknown_format",
            TagrankError::UsageError(_) => "usage_error",
            TagrankError::ConfigNotFound { .. } => "config_not_found",
            TagrankError::TagNotFound { .. } => "tag_not_found",
            TagrankError::DestinationNotFound { .. } => "destination_not_found",
            TagrankError::Provider { .. } => "provider_error",
            TagrankError::Interrupted => "interrupted",
            TagrankError::Io(_) => "io_error",
            TagrankError::Json(_) => "json_error",
            TagrankError::Toml(_) => "toml_error",
            TagrankError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for tagrank operations
pub type Result<T> = std::result::Result<T, TagrankError>;
