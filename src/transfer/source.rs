//! Store capabilities the transfer engine needs.
//!
//! The exporter and importer never touch the database directly; they are
//! handed something implementing [`ContactStore`]. `SqliteStorage` is the
//! production implementation.

use crate::error::Result;
use crate::model::ContactId;
use crate::transfer::batch::Mutation;

/// Query, batch-apply and bulk-delete access to an address-book store.
pub trait ContactStore {
    /// Top-level id of every live raw row across all accounts.
    ///
    /// A contact linked to several accounts may appear once per account;
    /// callers collapse duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn list_record_ids(&self) -> Result<Vec<ContactId>>;

    /// First display name of the contact, if it has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn fetch_display_name(&self, id: ContactId) -> Result<Option<String>>;

    /// Phone numbers in store order. Null values are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn fetch_phones(&self, id: ContactId) -> Result<Vec<String>>;

    /// Email addresses in store order. Null values are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn fetch_emails(&self, id: ContactId) -> Result<Vec<String>>;

    /// Remove every top-level record. Irreversible.
    ///
    /// Returns the number of removed records that [`list_record_ids`] would
    /// have reported, so the count matches what a listing showed.
    ///
    /// [`list_record_ids`]: ContactStore::list_record_ids
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete_all(&mut self) -> Result<usize>;

    /// Apply `ops` as one all-or-nothing unit.
    ///
    /// Back-references are resolved against the rows produced earlier in
    /// the same batch. Returns the row id produced by each operation.
    ///
    /// # Errors
    ///
    /// Returns an error if any operation fails; nothing from the batch is
    /// persisted in that case.
    fn apply_batch(&mut self, ops: &[Mutation]) -> Result<Vec<i64>>;
}
