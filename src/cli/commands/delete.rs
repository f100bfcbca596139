//! Delete-all command implementation.

use std::path::PathBuf;

use colored::Colorize;

use super::open_storage;
use crate::error::{Error, Result};
use crate::transfer::ContactStore;

/// Delete every contact in the database.
///
/// Refuses to run unless `confirmed` is set.
///
/// # Errors
///
/// Returns `ConfirmationRequired` without `--yes`, or an error if the
/// database cannot be opened or the delete fails.
pub fn execute(confirmed: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    if !confirmed {
        return Err(Error::ConfirmationRequired {
            action: "delete all contacts".to_string(),
        });
    }

    let mut storage = open_storage(db_path)?;
    let count = storage.delete_all()?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "count": count,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{} {count} contacts", "Deleted".red().bold());
    }

    Ok(())
}
