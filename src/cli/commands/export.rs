//! Export command implementation.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::open_storage;
use crate::config::resolve_transfer_file;
use crate::error::Result;
use crate::transfer::{Exporter, EXPORT_FILE_NAME};

/// Export every contact in the database to the transfer file.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the export fails.
pub fn execute(
    file: Option<&Path>,
    db_path: Option<&PathBuf>,
    dir: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let storage = open_storage(db_path)?;
    let output_path = resolve_transfer_file(dir.map(PathBuf::as_path), file, EXPORT_FILE_NAME)?;

    let stats = Exporter::new(&storage, output_path).export()?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "count": stats.records,
            "path": stats.path.display().to_string(),
            "completed_at": chrono::Utc::now().to_rfc3339(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else if stats.records == 0 {
        println!("No contacts to export.");
        println!("  Location: {}", stats.path.display());
    } else {
        println!(
            "{} {} contacts",
            "Exported".green().bold(),
            stats.records
        );
        println!("  Location: {}", stats.path.display());
    }

    Ok(())
}
