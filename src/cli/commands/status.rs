//! Status command implementation.
//!
//! Shows where the database and transfer files live and how many contacts
//! each holds.

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;

use super::open_storage;
use crate::config::{resolve_db_path, resolve_transfer_dir};
use crate::error::{Error, Result};
use crate::transfer::{count_records, EXPORT_FILE_NAME, IMPORT_FILE_NAME};

#[derive(Serialize)]
struct TransferFileInfo {
    name: &'static str,
    exists: bool,
    records: usize,
}

/// Show database and transfer file status.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a transfer file
/// cannot be read.
pub fn execute(db_path: Option<&PathBuf>, dir: Option<&PathBuf>, json: bool) -> Result<()> {
    let resolved_db = resolve_db_path(db_path.map(PathBuf::as_path));
    let storage = open_storage(db_path)?;
    let contacts = storage.count_contacts()?;

    let transfer_dir = resolve_transfer_dir(dir.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("Cannot determine transfer directory".to_string()))?;
    let files = [EXPORT_FILE_NAME, IMPORT_FILE_NAME]
        .into_iter()
        .map(|name| file_info(&transfer_dir, name))
        .collect::<Result<Vec<_>>>()?;

    if json {
        let output = serde_json::json!({
            "db": resolved_db.map(|p| p.display().to_string()),
            "contacts": contacts,
            "transfer_dir": transfer_dir.display().to_string(),
            "files": files,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if let Some(db) = resolved_db {
        println!("Database:  {}", db.display());
    }
    println!("Contacts:  {contacts}");
    println!("Transfer:  {}", transfer_dir.display());
    println!();
    for file in &files {
        if file.exists {
            println!("  {} {} ({} records)", "✓".green(), file.name, file.records);
        } else {
            println!("  {} {} (missing)", "✗".dimmed(), file.name);
        }
    }

    Ok(())
}

fn file_info(dir: &Path, name: &'static str) -> Result<TransferFileInfo> {
    let path = dir.join(name);
    Ok(TransferFileInfo {
        name,
        exists: path.exists(),
        records: count_records(&path)?,
    })
}
