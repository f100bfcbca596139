//! Import: transfer file → store.
//!
//! Each non-blank line moves through decode → batch build → submit on its
//! own. A line's batch is applied atomically by the store, so a rejected
//! record leaves nothing behind. What happens after a failed line is decided
//! by the [`FailurePolicy`].

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::transfer::batch::build_batch;
use crate::transfer::file::{decode_line, JsonlReader};
use crate::transfer::source::ContactStore;
use crate::transfer::types::{
    FailureKind, FailurePolicy, ImportReport, LineFailure, TransferError, TransferResult,
};

/// Default import file name inside the transfer directory.
pub const IMPORT_FILE_NAME: &str = "in.contacts";

/// Importer for transfer files.
pub struct Importer<'a, S: ContactStore + ?Sized> {
    store: &'a mut S,
    policy: FailurePolicy,
}

impl<'a, S: ContactStore + ?Sized> Importer<'a, S> {
    /// Create a new importer with the specified failure policy.
    #[must_use]
    pub fn new(store: &'a mut S, policy: FailurePolicy) -> Self {
        Self { store, policy }
    }

    /// Import the default file inside `dir`.
    ///
    /// # Errors
    ///
    /// See [`Importer::import`].
    pub fn import_from_dir(&mut self, dir: &Path) -> TransferResult<ImportReport> {
        self.import(&default_import_path(dir))
    }

    /// Import every record in `path`.
    ///
    /// Per-line failures never surface as `Err`; they are collected in the
    /// report. Under [`FailurePolicy::Abort`] the first failure also stops
    /// the run and is recorded in `aborted_at`.
    ///
    /// A line that is not valid UTF-8 counts as a decode failure for that
    /// line, like malformed JSON.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file is missing (nothing is applied),
    /// or an IO error if reading fails partway.
    pub fn import(&mut self, path: &Path) -> TransferResult<ImportReport> {
        let reader = JsonlReader::open(path)?;
        info!(path = %path.display(), policy = %self.policy, "Importing contacts");

        let mut report = ImportReport::default();

        for line in reader {
            let outcome = match line {
                Ok((_, text)) if text.trim().is_empty() => {
                    report.skipped_blank += 1;
                    continue;
                }
                Ok((line_num, text)) => self.import_line(line_num, &text, &mut report),
                Err(e @ TransferError::InvalidRecord { line, .. }) => Err(LineFailure {
                    line,
                    kind: FailureKind::Decode,
                    message: e.to_string(),
                }),
                Err(e) => return Err(e),
            };

            match outcome {
                Ok(line_num) => {
                    report.imported += 1;
                    debug!(line = line_num, "Imported contact");
                }
                Err(failure) => {
                    warn!(line = failure.line, kind = ?failure.kind, "{}", failure.message);
                    let line_num = failure.line;
                    report.failed.push(failure);
                    if self.policy == FailurePolicy::Abort {
                        report.aborted_at = Some(line_num);
                        break;
                    }
                }
            }
        }

        info!(
            submitted = report.submitted,
            imported = report.imported,
            failed = report.failed.len(),
            aborted = !report.completed(),
            "Import finished"
        );
        Ok(report)
    }

    /// Decode, build and submit one line. Returns the line number on commit.
    fn import_line(
        &mut self,
        line_num: usize,
        text: &str,
        report: &mut ImportReport,
    ) -> Result<usize, LineFailure> {
        let record = decode_line(line_num, text).map_err(|e| LineFailure {
            line: line_num,
            kind: FailureKind::Decode,
            message: e.to_string(),
        })?;

        let ops = build_batch(&record);
        report.submitted += 1;

        self.store
            .apply_batch(&ops)
            .map_err(|e| TransferError::BatchRejected {
                line: line_num,
                message: e.to_string(),
            })
            .map_err(|e| LineFailure {
                line: line_num,
                kind: FailureKind::Apply,
                message: e.to_string(),
            })?;

        Ok(line_num)
    }
}

/// Path of the default import file inside `dir`.
#[must_use]
pub fn default_import_path(dir: &Path) -> PathBuf {
    dir.join(IMPORT_FILE_NAME)
}
