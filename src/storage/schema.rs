//! Database schema definitions.
//!
//! The layout mirrors a contacts provider: top-level contacts, one raw row
//! per linked account, and typed data rows hanging off raw rows.

use rusqlite::{Connection, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the contacts database.
///
/// Timestamps are stored as INTEGER (Unix milliseconds).
pub const SCHEMA_SQL: &str = r"
-- ====================
-- Schema Version Tracking
-- ====================

CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- ====================
-- Core Tables
-- ====================

-- Contacts: one row per logical (top-level) record
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at INTEGER NOT NULL
);

-- Raw Contacts: one row per account a contact is linked to
CREATE TABLE IF NOT EXISTS raw_contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id INTEGER NOT NULL,
    account_type TEXT,
    account_name TEXT,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    FOREIGN KEY (contact_id) REFERENCES contacts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_raw_contacts_contact ON raw_contacts(contact_id);
CREATE INDEX IF NOT EXISTS idx_raw_contacts_deleted ON raw_contacts(deleted);

-- Data: typed sub-fields (name, phone, email)
CREATE TABLE IF NOT EXISTS data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    raw_contact_id INTEGER NOT NULL,
    mimetype TEXT NOT NULL,
    data1 TEXT,
    data2 INTEGER,
    FOREIGN KEY (raw_contact_id) REFERENCES raw_contacts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_data_raw_contact ON data(raw_contact_id);
CREATE INDEX IF NOT EXISTS idx_data_mimetype ON data(raw_contact_id, mimetype);
";

/// Apply the schema to a connection.
///
/// # Errors
///
/// Returns an error if any pragma or statement fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO data (raw_contact_id, mimetype, data1) VALUES (999, 'x', 'y')",
            [],
        );
        assert!(result.is_err());
    }
}
