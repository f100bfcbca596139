//! Export from one store, import into another, compare.

use std::fs;

use ct::model::ContactRecord;
use ct::storage::SqliteStorage;
use ct::transfer::{
    build_batch, default_import_path, snapshot, ContactStore, Exporter, FailurePolicy, Importer,
};
use proptest::prelude::*;
use tempfile::TempDir;

fn seed(storage: &mut SqliteStorage, records: &[ContactRecord]) {
    for record in records {
        storage.apply_batch(&build_batch(record)).unwrap();
    }
}

fn sample_records() -> Vec<ContactRecord> {
    vec![
        ContactRecord::named("Ann").with_phones(["555-1111", "555-1111"]),
        ContactRecord::named("Zoë Ünal 山田 🦀")
            .with_phones(["+49 30 1234"])
            .with_emails(["zoe@example.com", "ZOE@example.com"]),
        ContactRecord::named("Line\nBreak\r\nName\u{2028}Sep\u{2029}Para\u{85}Nel")
            .with_emails(["odd\nmail@example.com"]),
        ContactRecord::named("\"Quoted\" \\ backslash {braces}"),
        ContactRecord::named("Solo"),
    ]
}

#[test]
fn round_trip_preserves_names_phones_and_emails() {
    let temp_dir = TempDir::new().unwrap();
    let mut source = SqliteStorage::open(&temp_dir.path().join("source.db")).unwrap();
    let records = sample_records();
    seed(&mut source, &records);

    let stats = Exporter::into_dir(&source, temp_dir.path()).export().unwrap();
    assert_eq!(stats.records, records.len());

    let content = fs::read_to_string(&stats.path).unwrap();
    assert_eq!(content.lines().count(), records.len());
    assert!(!content.contains(['\u{85}', '\u{2028}', '\u{2029}']));

    let import_path = default_import_path(temp_dir.path());
    fs::rename(&stats.path, &import_path).unwrap();

    let mut target = SqliteStorage::open(&temp_dir.path().join("target.db")).unwrap();
    let report = Importer::new(&mut target, FailurePolicy::Continue)
        .import(&import_path)
        .unwrap();

    assert_eq!(report.imported, records.len());
    assert!(report.failed.is_empty());
    assert_eq!(snapshot(&target).unwrap(), records);
}

#[test]
fn round_trip_into_same_store_after_delete() {
    let temp_dir = TempDir::new().unwrap();
    let mut storage = SqliteStorage::open_memory().unwrap();
    let records = sample_records();
    seed(&mut storage, &records);

    let stats = Exporter::into_dir(&storage, temp_dir.path()).export().unwrap();
    assert_eq!(storage.delete_all().unwrap(), records.len());
    assert!(snapshot(&storage).unwrap().is_empty());

    Importer::new(&mut storage, FailurePolicy::Abort)
        .import(&stats.path)
        .unwrap();

    assert_eq!(snapshot(&storage).unwrap(), records);
}

#[test]
fn nameless_and_empty_records_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let mut source = SqliteStorage::open_memory().unwrap();
    let records = vec![
        ContactRecord::default().with_phones(["1"]),
        ContactRecord::default(),
    ];
    seed(&mut source, &records);

    let stats = Exporter::into_dir(&source, temp_dir.path()).export().unwrap();

    let mut target = SqliteStorage::open_memory().unwrap();
    Importer::new(&mut target, FailurePolicy::Continue)
        .import(&stats.path)
        .unwrap();

    let imported = snapshot(&target).unwrap();
    assert_eq!(imported.len(), 2);
    assert_eq!(imported[0].display_name, None);
    assert_eq!(imported[0].phones, vec!["1"]);
    assert_eq!(imported[1].display_name, None);
    assert!(imported[1].phones.is_empty());
    assert!(imported[1].emails.is_empty());
}

/// Text mixing arbitrary characters with line terminators and controls.
fn field_text(min_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            3 => any::<char>(),
            1 => prop::sample::select(vec![
                '\n', '\r', '\t', '\u{1}', '\u{1b}', '\u{7f}', '\u{85}', '\u{2028}', '\u{2029}',
            ]),
        ],
        min_len..24,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn contact_record() -> impl Strategy<Value = ContactRecord> {
    (
        field_text(1),
        prop::collection::vec(field_text(0), 0..4),
        prop::collection::vec(field_text(0), 0..4),
    )
        .prop_map(|(name, phones, emails)| {
            ContactRecord::named(&name)
                .with_phones(phones)
                .with_emails(emails)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_export_then_import_reproduces_records(
        records in prop::collection::vec(contact_record(), 0..8)
    ) {
        let temp_dir = TempDir::new().unwrap();
        let mut source = SqliteStorage::open_memory().unwrap();
        seed(&mut source, &records);

        let stats = Exporter::into_dir(&source, temp_dir.path()).export().unwrap();
        prop_assert_eq!(stats.records, records.len());

        let mut target = SqliteStorage::open_memory().unwrap();
        let report = Importer::new(&mut target, FailurePolicy::Abort)
            .import(&stats.path)
            .unwrap();

        prop_assert!(report.failed.is_empty());
        prop_assert_eq!(report.imported, records.len());
        prop_assert_eq!(snapshot(&target).unwrap(), records);
    }
}
