//! Import command implementation.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::open_storage;
use crate::config::resolve_transfer_file;
use crate::error::{Error, Result};
use crate::transfer::{FailureKind, FailurePolicy, ImportReport, Importer, IMPORT_FILE_NAME};

/// Import contacts from the transfer file.
///
/// Under `continue`, failed lines are reported but the command succeeds.
/// Under `abort`, the first failed line turns into an `ImportAborted` error.
///
/// # Errors
///
/// Returns an error if the database cannot be opened, the file is missing,
/// or the run was aborted.
pub fn execute(
    file: Option<&Path>,
    policy: FailurePolicy,
    db_path: Option<&PathBuf>,
    dir: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let mut storage = open_storage(db_path)?;
    let input_path = resolve_transfer_file(dir.map(PathBuf::as_path), file, IMPORT_FILE_NAME)?;

    let report = Importer::new(&mut storage, policy).import(&input_path)?;

    if json {
        let output = serde_json::json!({
            "success": report.completed(),
            "count": report.imported,
            "path": input_path.display().to_string(),
            "policy": policy,
            "report": report,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        print_report(&report, &input_path);
    }

    match report.aborted_at {
        Some(line) => Err(Error::ImportAborted {
            line,
            imported: report.imported,
        }),
        None => Ok(()),
    }
}

fn print_report(report: &ImportReport, path: &Path) {
    println!(
        "{} {} contacts from {}",
        "Imported".green().bold(),
        report.imported,
        path.display()
    );

    if report.failed.is_empty() {
        return;
    }

    println!();
    println!("{}", format!("{} lines failed:", report.failed.len()).yellow());
    for failure in &report.failed {
        let stage = match failure.kind {
            FailureKind::Decode => "decode",
            FailureKind::Apply => "apply",
        };
        println!("  line {} ({stage}): {}", failure.line, failure.message);
    }
}
