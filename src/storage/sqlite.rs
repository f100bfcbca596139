//! SQLite storage implementation.
//!
//! This module provides the address-book store backing the transfer engine.
//! Every write goes through [`SqliteStorage::mutate`], so a batch either
//! commits as a whole or leaves no trace.

use crate::error::{Error, Result};
use crate::model::{Account, ContactId};
use crate::storage::schema::apply_schema;
use crate::transfer::batch::{MIME_EMAIL, MIME_NAME, MIME_PHONE, Mutation, PhoneType, RowRef};
use crate::transfer::ContactStore;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Top-level contacts with at least one live raw row.
const COUNT_LIVE_CONTACTS: &str =
    "SELECT COUNT(DISTINCT contact_id) FROM raw_contacts WHERE deleted = 0";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

/// Row produced by one operation of a batch.
#[derive(Debug, Clone, Copy)]
enum Produced {
    RawContact(i64),
    Data(i64),
}

impl Produced {
    const fn id(self) -> i64 {
        match self {
            Self::RawContact(id) | Self::Data(id) => id,
        }
    }
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        if let Some(timeout) = timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        } else {
            // Default 5 second timeout
            conn.busy_timeout(Duration::from_secs(5))?;
        }

        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute a mutation inside an IMMEDIATE transaction.
    ///
    /// The transaction commits only if the closure succeeds; on error it is
    /// dropped and rolled back.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let result = f(&tx)?;

        tx.commit()?;
        debug!(op, "committed");

        Ok(result)
    }

    /// Link an existing contact to another account by adding a raw row.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact does not exist or the insert fails.
    pub fn link_account(&mut self, contact: ContactId, account: &Account) -> Result<i64> {
        self.mutate("link_account", |tx| {
            tx.execute(
                "INSERT INTO raw_contacts (contact_id, account_type, account_name, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    contact.0,
                    account.account_type,
                    account.account_name,
                    chrono::Utc::now().timestamp_millis()
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// Soft-delete a raw row. Returns false if no such row exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_raw_contact_deleted(&mut self, raw_contact_id: i64) -> Result<bool> {
        self.mutate("mark_raw_contact_deleted", |tx| {
            let rows = tx.execute(
                "UPDATE raw_contacts SET deleted = 1 WHERE id = ?1",
                [raw_contact_id],
            )?;
            Ok(rows > 0)
        })
    }

    /// Top-level contact owning a raw row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn contact_for_raw(&self, raw_contact_id: i64) -> Result<Option<ContactId>> {
        let id = self
            .conn
            .query_row(
                "SELECT contact_id FROM raw_contacts WHERE id = ?1",
                [raw_contact_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id.map(ContactId))
    }

    /// Phone numbers with their type tags, in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_phone_entries(&self, id: ContactId) -> Result<Vec<(String, Option<PhoneType>)>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.data1, d.data2 FROM data d
             JOIN raw_contacts r ON r.id = d.raw_contact_id
             WHERE r.contact_id = ?1 AND r.deleted = 0 AND d.mimetype = ?2
             ORDER BY d.id",
        )?;
        let rows = stmt.query_map(params![id.0, MIME_PHONE], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<i64>>(1)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            if let (Some(number), code) = row? {
                entries.push((number, code.and_then(PhoneType::from_code)));
            }
        }
        Ok(entries)
    }

    /// Number of top-level contacts with at least one live raw row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_contacts(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(COUNT_LIVE_CONTACTS, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn fetch_data_values(&self, id: ContactId, mimetype: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.data1 FROM data d
             JOIN raw_contacts r ON r.id = d.raw_contact_id
             WHERE r.contact_id = ?1 AND r.deleted = 0 AND d.mimetype = ?2
             ORDER BY d.id",
        )?;
        let rows = stmt.query_map(params![id.0, mimetype], |row| {
            row.get::<_, Option<String>>(0)
        })?;

        let mut values = Vec::new();
        for value in rows {
            if let Some(value) = value? {
                values.push(value);
            }
        }
        Ok(values)
    }
}

/// Resolve a raw-contact reference for operation `index` of a batch.
fn resolve_row_ref(row_ref: RowRef, index: usize, produced: &[Produced]) -> Result<i64> {
    match row_ref {
        RowRef::Id(id) => Ok(id),
        RowRef::BackReference(target) if target >= index => Err(Error::InvalidArgument(format!(
            "operation {index} back-references operation {target}, which has not run yet"
        ))),
        RowRef::BackReference(target) => match produced[target] {
            Produced::RawContact(id) => Ok(id),
            Produced::Data(_) => Err(Error::InvalidArgument(format!(
                "operation {index} back-references operation {target}, which is not a raw contact insert"
            ))),
        },
    }
}

impl ContactStore for SqliteStorage {
    fn list_record_ids(&self) -> Result<Vec<ContactId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT contact_id FROM raw_contacts WHERE deleted = 0 ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for id in rows {
            let id = ContactId(id?);
            if seen.insert(id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn fetch_display_name(&self, id: ContactId) -> Result<Option<String>> {
        let name = self
            .conn
            .query_row(
                "SELECT d.data1 FROM data d
                 JOIN raw_contacts r ON r.id = d.raw_contact_id
                 WHERE r.contact_id = ?1 AND r.deleted = 0
                   AND d.mimetype = ?2 AND d.data1 IS NOT NULL
                 ORDER BY d.id LIMIT 1",
                params![id.0, MIME_NAME],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    fn fetch_phones(&self, id: ContactId) -> Result<Vec<String>> {
        self.fetch_data_values(id, MIME_PHONE)
    }

    fn fetch_emails(&self, id: ContactId) -> Result<Vec<String>> {
        self.fetch_data_values(id, MIME_EMAIL)
    }

    fn delete_all(&mut self) -> Result<usize> {
        // Raw rows and data rows go with their contact via ON DELETE CASCADE.
        // Contacts left with only soft-deleted raw rows are purged too but not
        // counted, matching what `list_record_ids` shows.
        self.mutate("delete_all", |tx| {
            let live: i64 = tx.query_row(COUNT_LIVE_CONTACTS, [], |row| row.get(0))?;
            tx.execute("DELETE FROM contacts", [])?;
            Ok(usize::try_from(live).unwrap_or_default())
        })
    }

    fn apply_batch(&mut self, ops: &[Mutation]) -> Result<Vec<i64>> {
        self.mutate("apply_batch", |tx| {
            let now = chrono::Utc::now().timestamp_millis();
            let mut produced = Vec::with_capacity(ops.len());

            for (index, op) in ops.iter().enumerate() {
                match op {
                    Mutation::InsertRawContact { account } => {
                        tx.execute("INSERT INTO contacts (created_at) VALUES (?1)", [now])?;
                        let contact_id = tx.last_insert_rowid();
                        tx.execute(
                            "INSERT INTO raw_contacts (contact_id, account_type, account_name, created_at)
                             VALUES (?1, ?2, ?3, ?4)",
                            params![
                                contact_id,
                                account.as_ref().map(|a| a.account_type.as_str()),
                                account.as_ref().map(|a| a.account_name.as_str()),
                                now
                            ],
                        )?;
                        produced.push(Produced::RawContact(tx.last_insert_rowid()));
                    }
                    Mutation::InsertData { raw_contact, value } => {
                        let raw_id = resolve_row_ref(*raw_contact, index, &produced)?;
                        tx.execute(
                            "INSERT INTO data (raw_contact_id, mimetype, data1, data2)
                             VALUES (?1, ?2, ?3, ?4)",
                            params![raw_id, value.mimetype(), value.text(), value.type_code()],
                        )?;
                        produced.push(Produced::Data(tx.last_insert_rowid()));
                    }
                }
            }

            Ok(produced.into_iter().map(Produced::id).collect())
        })
    }
}
