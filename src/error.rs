//! Error types for the contacts transfer CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=store, 3=not_found, 4=validation, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

use crate::transfer::TransferError;

/// Result type alias for contacts transfer operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Store (exit 2)
    DatabaseError,
    SourceUnavailable,

    // Not Found (exit 3)
    FileNotFound,

    // Validation (exit 4)
    InvalidArgument,
    ConfirmationRequired,

    // Transfer (exit 6)
    TransferError,
    ImportAborted,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::SourceUnavailable => "SOURCE_UNAVAILABLE",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::ConfirmationRequired => "CONFIRMATION_REQUIRED",
            Self::TransferError => "TRANSFER_ERROR",
            Self::ImportAborted => "IMPORT_ABORTED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::DatabaseError | Self::SourceUnavailable => 2,
            Self::FileNotFound => 3,
            Self::InvalidArgument | Self::ConfirmationRequired => 4,
            Self::TransferError | Self::ImportAborted => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether re-running with corrected input can succeed.
    ///
    /// Nothing is retried automatically; this only informs the caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument
                | Self::ConfirmationRequired
                | Self::FileNotFound
                | Self::DatabaseError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in contacts transfer operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Contact source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Transfer file not found: {}", path.display())]
    FileMissing { path: PathBuf },

    #[error("Refusing to {action} without confirmation")]
    ConfirmationRequired { action: String },

    #[error("Import stopped at line {line} after {imported} contacts")]
    ImportAborted { line: usize, imported: usize },

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<TransferError> for Error {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Io(e) => Self::Io(e),
            TransferError::Json(e) => Self::Json(e),
            TransferError::SourceUnavailable(msg) => Self::SourceUnavailable(msg),
            TransferError::FileNotFound(path) => Self::FileMissing {
                path: PathBuf::from(path),
            },
            other => Self::Transfer(other.to_string()),
        }
    }
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::SourceUnavailable(_) => ErrorCode::SourceUnavailable,
            Self::FileMissing { .. } => ErrorCode::FileNotFound,
            Self::ConfirmationRequired { .. } => ErrorCode::ConfirmationRequired,
            Self::ImportAborted { .. } => ErrorCode::ImportAborted,
            Self::Transfer(_) => ErrorCode::TransferError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::FileMissing { path } => Some(format!(
                "Place a transfer file at {} or pass --file. \
                 Files written by `ct export` are named out.contacts.",
                path.display()
            )),

            Self::ConfirmationRequired { .. } => {
                Some("Re-run with --yes to confirm. This cannot be undone.".to_string())
            }

            Self::ImportAborted { line, .. } => Some(format!(
                "Fix line {line} or re-run with --on-error continue to skip bad lines. \
                 Records before line {line} were already imported."
            )),

            Self::SourceUnavailable(_) => {
                Some("Check that the database path is correct (--db or CT_DB).".to_string())
            }

            Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Transfer(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
