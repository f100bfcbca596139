//! Command implementations.

pub mod completions;
pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod status;
pub mod version;

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use std::path::PathBuf;

/// Open the contacts database, creating it if needed.
fn open_storage(db_path: Option<&PathBuf>) -> Result<SqliteStorage> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path)).ok_or_else(|| {
        Error::Config("Cannot determine database location; pass --db or set CT_DB".to_string())
    })?;
    SqliteStorage::open(&db_path)
}
