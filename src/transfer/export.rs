//! Export: store contents → transfer file.
//!
//! # Record Assembly
//!
//! Top-level ids are listed once, collapsed so that a contact linked to
//! several accounts is visited once, and each contact is assembled from its
//! display name, phones and emails.
//!
//! # Output
//!
//! The destination is truncated and written as a stream: one complete line
//! per record, in id order. The handle is flushed and synced once at the
//! end. A failure midway leaves the lines written so far in place.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::model::{ContactId, ContactRecord};
use crate::transfer::file::JsonlWriter;
use crate::transfer::source::ContactStore;
use crate::transfer::types::{ExportStats, TransferError, TransferResult};

/// Default export file name inside the transfer directory.
pub const EXPORT_FILE_NAME: &str = "out.contacts";

/// Exporter for transfer files.
pub struct Exporter<'a, S: ContactStore + ?Sized> {
    store: &'a S,
    output_path: PathBuf,
}

impl<'a, S: ContactStore + ?Sized> Exporter<'a, S> {
    /// Create an exporter writing to `output_path`.
    #[must_use]
    pub fn new(store: &'a S, output_path: PathBuf) -> Self {
        Self { store, output_path }
    }

    /// Create an exporter writing the default file inside `dir`.
    #[must_use]
    pub fn into_dir(store: &'a S, dir: &Path) -> Self {
        Self::new(store, dir.join(EXPORT_FILE_NAME))
    }

    /// Get the output path.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Export every contact.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The store cannot list contacts (`SourceUnavailable`, no file written)
    /// - A field query fails for any contact (`FieldFetch`)
    /// - The file cannot be written
    pub fn export(&self) -> TransferResult<ExportStats> {
        let ids = unique_ids(self.store)?;
        info!(
            contacts = ids.len(),
            path = %self.output_path.display(),
            "Exporting contacts"
        );

        let mut writer = JsonlWriter::create(&self.output_path)?;
        for id in ids {
            let record = assemble(self.store, id)?;
            writer.write_record(&record)?;
            debug!(%id, written = writer.written(), "Exported contact");
        }
        let records = writer.finish()?;

        info!(records, path = %self.output_path.display(), "Export complete");
        Ok(ExportStats {
            records,
            path: self.output_path.clone(),
        })
    }
}

/// Assemble every contact without writing anything.
///
/// # Errors
///
/// Same store errors as [`Exporter::export`].
pub fn snapshot<S: ContactStore + ?Sized>(store: &S) -> TransferResult<Vec<ContactRecord>> {
    unique_ids(store)?
        .into_iter()
        .map(|id| assemble(store, id))
        .collect()
}

/// List top-level ids, keeping the first occurrence of each.
fn unique_ids<S: ContactStore + ?Sized>(store: &S) -> TransferResult<Vec<ContactId>> {
    let ids = store
        .list_record_ids()
        .map_err(|e| TransferError::SourceUnavailable(e.to_string()))?;
    Ok(dedupe_ids(ids))
}

/// Build one record from its store fields.
fn assemble<S: ContactStore + ?Sized>(store: &S, id: ContactId) -> TransferResult<ContactRecord> {
    let field_error = |field: &'static str| {
        move |e: crate::error::Error| TransferError::FieldFetch {
            id,
            field,
            message: e.to_string(),
        }
    };

    let display_name = store
        .fetch_display_name(id)
        .map_err(field_error("display name"))?;
    let phones = store.fetch_phones(id).map_err(field_error("phones"))?;
    let emails = store.fetch_emails(id).map_err(field_error("emails"))?;

    Ok(ContactRecord {
        display_name,
        phones,
        emails,
        notes: None,
    })
}

/// Collapse duplicate ids, preserving first-seen order.
#[must_use]
pub fn dedupe_ids(ids: Vec<ContactId>) -> Vec<ContactId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::model::Account;
    use crate::storage::SqliteStorage;
    use crate::transfer::batch::{build_batch, Mutation};
    use crate::transfer::file::decode_line;
    use std::fs;
    use tempfile::TempDir;

    fn insert(storage: &mut SqliteStorage, record: &ContactRecord) -> ContactId {
        let ids = storage.apply_batch(&build_batch(record)).unwrap();
        storage.contact_for_raw(ids[0]).unwrap().unwrap()
    }

    fn read_records(path: &Path) -> Vec<ContactRecord> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .enumerate()
            .map(|(i, line)| decode_line(i + 1, line).unwrap())
            .collect()
    }

    /// Store whose queries can be made to fail.
    struct FlakyStore {
        ids: Vec<ContactId>,
        list_fails: bool,
        phones_fail_for: Option<ContactId>,
    }

    impl ContactStore for FlakyStore {
        fn list_record_ids(&self) -> Result<Vec<ContactId>> {
            if self.list_fails {
                return Err(Error::Other("provider gone".to_string()));
            }
            Ok(self.ids.clone())
        }

        fn fetch_display_name(&self, id: ContactId) -> Result<Option<String>> {
            Ok(Some(format!("Contact {id}")))
        }

        fn fetch_phones(&self, id: ContactId) -> Result<Vec<String>> {
            if self.phones_fail_for == Some(id) {
                return Err(Error::Other("cursor closed".to_string()));
            }
            Ok(Vec::new())
        }

        fn fetch_emails(&self, _id: ContactId) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn delete_all(&mut self) -> Result<usize> {
            Ok(0)
        }

        fn apply_batch(&mut self, _ops: &[Mutation]) -> Result<Vec<i64>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_export_writes_one_line_per_contact() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = SqliteStorage::open_memory().unwrap();
        insert(
            &mut storage,
            &ContactRecord::named("Ann").with_phones(["555-1111"]),
        );
        insert(
            &mut storage,
            &ContactRecord::named("Bo").with_emails(["bo@example.com", "bo@example.com"]),
        );

        let exporter = Exporter::into_dir(&storage, temp_dir.path());
        let stats = exporter.export().unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(stats.path, temp_dir.path().join(EXPORT_FILE_NAME));
        let records = read_records(&stats.path);
        assert_eq!(
            records,
            vec![
                ContactRecord::named("Ann").with_phones(["555-1111"]),
                ContactRecord::named("Bo").with_emails(["bo@example.com", "bo@example.com"]),
            ]
        );
    }

    #[test]
    fn test_export_dedupes_linked_accounts() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = SqliteStorage::open_memory().unwrap();
        let id = insert(&mut storage, &ContactRecord::named("Ann"));
        storage
            .link_account(id, &Account::new("com.example", "ann@work"))
            .unwrap();

        let stats = Exporter::into_dir(&storage, temp_dir.path())
            .export()
            .unwrap();

        assert_eq!(stats.records, 1);
        assert_eq!(read_records(&stats.path).len(), 1);
    }

    #[test]
    fn test_export_absent_name_written_as_null() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = SqliteStorage::open_memory().unwrap();
        insert(&mut storage, &ContactRecord::default().with_phones(["1"]));

        let stats = Exporter::into_dir(&storage, temp_dir.path())
            .export()
            .unwrap();

        let content = fs::read_to_string(&stats.path).unwrap();
        assert_eq!(content, "{\"displayName\":null,\"phones\":[\"1\"],\"emails\":[]}\n");
    }

    #[test]
    fn test_export_empty_store_writes_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SqliteStorage::open_memory().unwrap();

        let stats = Exporter::into_dir(&storage, temp_dir.path())
            .export()
            .unwrap();

        assert_eq!(stats.records, 0);
        assert_eq!(fs::read_to_string(&stats.path).unwrap(), "");
    }

    #[test]
    fn test_source_unavailable_produces_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlakyStore {
            ids: vec![ContactId(1)],
            list_fails: true,
            phones_fail_for: None,
        };

        let exporter = Exporter::into_dir(&store, temp_dir.path());
        let result = exporter.export();

        assert!(matches!(result, Err(TransferError::SourceUnavailable(_))));
        assert!(!exporter.output_path().exists());
    }

    #[test]
    fn test_field_fetch_failure_is_not_empty_phones() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlakyStore {
            ids: vec![ContactId(1), ContactId(2), ContactId(3)],
            list_fails: false,
            phones_fail_for: Some(ContactId(2)),
        };

        let exporter = Exporter::into_dir(&store, temp_dir.path());
        let result = exporter.export();

        assert!(matches!(
            result,
            Err(TransferError::FieldFetch {
                id: ContactId(2),
                field: "phones",
                ..
            })
        ));
    }

    #[test]
    fn test_snapshot_dedupes_adapter_duplicates() {
        let store = FlakyStore {
            ids: vec![ContactId(2), ContactId(1), ContactId(2)],
            list_fails: false,
            phones_fail_for: None,
        };

        let records = snapshot(&store).unwrap();

        let names: Vec<_> = records
            .iter()
            .map(|r| r.display_name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["Contact 2", "Contact 1"]);
    }

    #[test]
    fn test_dedupe_ids_keeps_first_occurrence() {
        let ids = vec![ContactId(3), ContactId(1), ContactId(3), ContactId(2), ContactId(1)];
        assert_eq!(
            dedupe_ids(ids),
            vec![ContactId(3), ContactId(1), ContactId(2)]
        );
    }
}
