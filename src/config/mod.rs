//! Configuration management.
//!
//! Resolves where the contacts database lives and where transfer files are
//! written and read.
//!
//! # Locations
//!
//! - **Database**: `~/.contacts-transfer/data/contacts.db`
//! - **Transfer directory**: `<downloads>/contacts-transfer/`, shared by
//!   export (`out.contacts`) and import (`in.contacts`)

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory name derived from the application identifier.
pub const APP_DIR_NAME: &str = "contacts-transfer";

/// Environment variable overriding the database path.
pub const DB_ENV: &str = "CT_DB";

/// Environment variable overriding the transfer directory.
pub const TRANSFER_DIR_ENV: &str = "CT_TRANSFER_DIR";

/// Get the global application directory (`~/.contacts-transfer/`).
#[must_use]
pub fn global_app_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(format!(".{APP_DIR_NAME}")))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `CT_DB` environment variable
/// 3. Global location: `~/.contacts-transfer/data/contacts.db`
///
/// # Returns
///
/// Returns the path to the database file, or `None` if no location found.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Some(path) = non_empty_env(DB_ENV) {
        return Some(path);
    }

    global_app_dir().map(|dir| dir.join("data").join("contacts.db"))
}

/// Resolve the shared transfer directory.
///
/// Priority:
/// 1. If `explicit_dir` is provided, use it directly
/// 2. `CT_TRANSFER_DIR` environment variable
/// 3. `<downloads>/contacts-transfer`
/// 4. `~/Downloads/contacts-transfer` when the platform reports no
///    downloads directory
#[must_use]
pub fn resolve_transfer_dir(explicit_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit_dir {
        return Some(dir.to_path_buf());
    }

    if let Some(dir) = non_empty_env(TRANSFER_DIR_ENV) {
        return Some(dir);
    }

    directories::UserDirs::new()
        .and_then(|dirs| {
            dirs.download_dir()
                .map(Path::to_path_buf)
                .or_else(|| Some(dirs.home_dir().join("Downloads")))
        })
        .map(|downloads| downloads.join(APP_DIR_NAME))
}

/// Resolve a transfer file path.
///
/// A `file` containing a path separator is used as given; a bare name is
/// placed inside the transfer directory. Without `file`, `default_name` is
/// used.
///
/// # Errors
///
/// Returns a configuration error if no transfer directory can be found.
pub fn resolve_transfer_file(
    explicit_dir: Option<&Path>,
    file: Option<&Path>,
    default_name: &str,
) -> Result<PathBuf> {
    if let Some(file) = file {
        if file.components().count() > 1 || file.is_absolute() {
            return Ok(file.to_path_buf());
        }
    }

    let dir = resolve_transfer_dir(explicit_dir).ok_or_else(|| {
        Error::Config(format!(
            "Cannot determine transfer directory; pass --dir or set {TRANSFER_DIR_ENV}"
        ))
    })?;

    Ok(dir.join(file.unwrap_or_else(|| Path::new(default_name))))
}

fn non_empty_env(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
