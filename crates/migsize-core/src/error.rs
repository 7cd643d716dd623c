//! Error types and exit codes for migsize
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, invalid policy or config values)
//! - 3: Data error (unreadable inventory rows or CSV, incomplete batch)

use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args/policy (2)
    Usage = 2,
    /// Data error - bad inventory input (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during migsize operations
#[derive(Error, Debug)]
pub enum MigsizeError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or csv)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid policy: {field} = {value} ({reason})")]
    InvalidPolicy {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid size: {value} (sizes must be finite and >= 0)")]
    InvalidSize { value: f64 },

    #[error("unknown platform: {name} (known: {known})")]
    UnknownPlatform { name: String, known: String },

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("input is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("{failed} of {total} records could not be estimated")]
    BatchIncomplete { failed: usize, total: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl MigsizeError {
    /// Create an error for a policy field outside its valid domain
    pub fn invalid_policy(field: &'static str, value: f64, reason: &'static str) -> Self {
        MigsizeError::InvalidPolicy {
            field,
            value,
            reason,
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        MigsizeError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a malformed inventory row
    pub fn invalid_record(line: usize, reason: impl Into<String>) -> Self {
        MigsizeError::InvalidRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        MigsizeError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            MigsizeError::UnknownFormat(_)
            | MigsizeError::UsageError(_)
            | MigsizeError::InvalidPolicy { .. }
            | MigsizeError::InvalidSize { .. }
            | MigsizeError::UnknownPlatform { .. }
            | MigsizeError::InvalidValue { .. } => ExitCode::Usage,

            MigsizeError::InvalidRecord { .. }
            | MigsizeError::MissingColumn { .. }
            | MigsizeError::BatchIncomplete { .. }
            | MigsizeError::Csv(_) => ExitCode::Data,

            MigsizeError::Io(_)
            | MigsizeError::Json(_)
            | MigsizeError::Toml(_)
            | MigsizeError::FailedOperationWithTarget { .. }
            | MigsizeError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            MigsizeError::UnknownFormat(_) => "unknown_format",
            MigsizeError::UsageError(_) => "usage_error",
            MigsizeError::InvalidPolicy { .. } => "invalid_policy",
            MigsizeError::InvalidSize { .. } => "invalid_size",
            MigsizeError::UnknownPlatform { .. } => "unknown_platform",
            MigsizeError::InvalidValue { .. } => "invalid_value",
            MigsizeError::InvalidRecord { .. } => "invalid_record",
            MigsizeError::MissingColumn { .. } => "missing_column",
            MigsizeError::BatchIncomplete { .. } => "batch_incomplete",
            MigsizeError::Csv(_) => "csv_error",
            MigsizeError::Io(_) => "io_error",
            MigsizeError::Json(_) => "json_error",
            MigsizeError::Toml(_) => "toml_error",
            MigsizeError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            MigsizeError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
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

/// Result type alias for migsize operations
pub type Result<T> = std::result::Result<T, MigsizeError>;
