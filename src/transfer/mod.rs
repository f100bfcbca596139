//! Bulk contact transfer.
//!
//! This module moves the whole address book through a line-oriented file:
//!
//! - **Export**: store → one JSON object per contact per line
//! - **Import**: line → ordered mutation batch → atomic store apply
//! - **Host**: boolean-result wrappers for embedding applications
//!
//! # File Format
//!
//! UTF-8, one record per line, no wrapper array:
//! ```json
//! {"displayName":"Ann","phones":["555-1111","555-1111"],"emails":[]}
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ct::transfer::{Exporter, Importer, FailurePolicy};
//!
//! let stats = Exporter::into_dir(&storage, &dir).export()?;
//!
//! let mut importer = Importer::new(&mut storage, FailurePolicy::Continue);
//! let report = importer.import(&path)?;
//! ```

pub mod batch;
mod export;
mod file;
pub mod host;
mod import;
mod source;
mod types;

pub use batch::{build_batch, DataValue, Mutation, PhoneType, RowRef};
pub use export::{dedupe_ids, snapshot, Exporter, EXPORT_FILE_NAME};
pub use file::{count_records, decode_line, encode_line, JsonlReader, JsonlWriter};
pub use import::{default_import_path, Importer, IMPORT_FILE_NAME};
pub use source::ContactStore;
pub use types::{
    ExportStats, FailureKind, FailurePolicy, ImportReport, LineFailure, TransferError,
    TransferResult,
};
