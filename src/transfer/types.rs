//! Result, statistics and error types for transfer runs.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::model::ContactId;

/// What the importer does when a line cannot be decoded or its batch is
/// rejected by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and move on to the next line.
    #[default]
    Continue,
    /// Stop at the first failing line.
    Abort,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            _ => Err(format!("Unknown failure policy: {s}")),
        }
    }
}

/// Statistics for an export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportStats {
    /// Number of records written.
    pub records: usize,
    /// Destination file.
    pub path: PathBuf,
}

/// Stage at which a line failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The line is not a well-formed record.
    Decode,
    /// The store rejected the record's batch.
    Apply,
}

/// One failed line of an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFailure {
    /// Physical line number (1-indexed).
    pub line: usize,
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of an import run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportReport {
    /// Batches handed to the store.
    pub submitted: usize,
    /// Batches the store committed.
    pub imported: usize,
    /// Whitespace-only lines that were ignored.
    pub skipped_blank: usize,
    /// Failed lines in file order.
    pub failed: Vec<LineFailure>,
    /// Line that stopped the run under [`FailurePolicy::Abort`].
    pub aborted_at: Option<usize>,
}

impl ImportReport {
    /// True when the run read every line.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.aborted_at.is_none()
    }

    /// Line numbers of every failed line.
    #[must_use]
    pub fn failed_lines(&self) -> Vec<usize> {
        self.failed.iter().map(|f| f.line).collect()
    }
}

/// Transfer-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store could not list top-level records.
    #[error("Contact source unavailable: {0}")]
    SourceUnavailable(String),

    /// A sub-field query failed for one record.
    #[error("Failed to fetch {field} for contact {id}: {message}")]
    FieldFetch {
        id: ContactId,
        field: &'static str,
        message: String,
    },

    /// Transfer file not found.
    #[error("Transfer file not found: {0}")]
    FileNotFound(String),

    /// Invalid record format.
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord {
        /// Line number (1-indexed).
        line: usize,
        /// Error message.
        message: String,
    },

    /// The store rejected a record's batch.
    #[error("Batch rejected at line {line}: {message}")]
    BatchRejected { line: usize, message: String },
}

/// Result type for transfer operations.
pub type TransferResult<T> = std::result::Result<T, TransferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_default() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Continue);
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!("abort".parse::<FailurePolicy>(), Ok(FailurePolicy::Abort));
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_import_report_failed_lines() {
        let report = ImportReport {
            submitted: 3,
            imported: 2,
            failed: vec![LineFailure {
                line: 4,
                kind: FailureKind::Apply,
                message: "rejected".to_string(),
            }],
            ..ImportReport::default()
        };
        assert!(report.completed());
        assert_eq!(report.failed_lines(), vec![4]);
    }
}
