//! Boolean-result entry points for embedding hosts.
//!
//! Each call runs one blocking unit of work, catches any error once, logs it
//! and folds it into a flat outcome with a user-facing message. Callers that
//! want structured errors use [`Exporter`] and [`Importer`] directly.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::transfer::export::Exporter;
use crate::transfer::import::Importer;
use crate::transfer::source::ContactStore;
use crate::transfer::types::FailurePolicy;

/// Result of [`export`].
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub success: bool,
    pub count: usize,
    pub path: PathBuf,
    pub message: String,
}

/// Result of [`delete_all`].
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub count: usize,
    pub message: String,
}

/// Result of [`import`].
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub success: bool,
    /// Records committed to the store.
    pub count: usize,
    pub failed_lines: Vec<usize>,
    pub message: String,
}

/// Export every contact in `store` to `path`.
pub fn export<S: ContactStore + ?Sized>(store: &S, path: &Path) -> ExportOutcome {
    match Exporter::new(store, path.to_path_buf()).export() {
        Ok(stats) => ExportOutcome {
            success: true,
            count: stats.records,
            message: format!(
                "Exported {} contacts to {}",
                stats.records,
                stats.path.display()
            ),
            path: stats.path,
        },
        Err(e) => {
            error!(error = %e, "Export failed");
            ExportOutcome {
                success: false,
                count: 0,
                path: path.to_path_buf(),
                message: format!("Export error: {e}"),
            }
        }
    }
}

/// Remove every contact from `store`.
pub fn delete_all<S: ContactStore + ?Sized>(store: &mut S) -> DeleteOutcome {
    match store.delete_all() {
        Ok(count) => {
            info!(count, "Deleted all contacts");
            DeleteOutcome {
                success: true,
                count,
                message: format!("Deleted {count} contacts"),
            }
        }
        Err(e) => {
            error!(error = %e, "Delete failed");
            DeleteOutcome {
                success: false,
                count: 0,
                message: format!("Delete error: {e}"),
            }
        }
    }
}

/// Import every record in `path` into `store`.
///
/// `success` is false when the file is missing, unreadable, or the run was
/// aborted by `policy`. Failed lines under `Continue` are listed but do not
/// clear `success`.
pub fn import<S: ContactStore + ?Sized>(
    store: &mut S,
    path: &Path,
    policy: FailurePolicy,
) -> ImportOutcome {
    match Importer::new(store, policy).import(path) {
        Ok(report) => {
            let failed_lines = report.failed_lines();
            match report.aborted_at {
                Some(line) => ImportOutcome {
                    success: false,
                    count: report.imported,
                    message: format!(
                        "Import stopped at line {line} after {} contacts from {}",
                        report.imported,
                        path.display()
                    ),
                    failed_lines,
                },
                None => {
                    let mut message = format!(
                        "Imported {} contacts from {}",
                        report.imported,
                        path.display()
                    );
                    if !failed_lines.is_empty() {
                        message.push_str(&format!(" ({} lines failed)", failed_lines.len()));
                    }
                    ImportOutcome {
                        success: true,
                        count: report.imported,
                        failed_lines,
                        message,
                    }
                }
            }
        }
        Err(e) => {
            error!(error = %e, "Import failed");
            ImportOutcome {
                success: false,
                count: 0,
                failed_lines: Vec::new(),
                message: format!("Import error: {e}"),
            }
        }
    }
}
