//! List command implementation.

use std::path::PathBuf;

use colored::Colorize;

use super::open_storage;
use crate::error::Result;
use crate::transfer::snapshot;

/// Print every contact in the canonical transfer shape.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
pub fn execute(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let storage = open_storage(db_path)?;
    let records = snapshot(&storage)?;

    if json {
        println!("{}", serde_json::to_string(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No contacts.");
        return Ok(());
    }

    for record in &records {
        let name = record
            .display_name
            .as_deref()
            .map_or_else(|| "(no name)".dimmed().to_string(), |n| n.bold().to_string());
        println!("{name}");
        for phone in &record.phones {
            println!("  phone  {phone}");
        }
        for email in &record.emails {
            println!("  email  {email}");
        }
    }
    println!();
    println!("{} contacts", records.len());

    Ok(())
}
