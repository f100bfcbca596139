//! Store mutations and per-record batch construction.
//!
//! A record becomes one ordered batch: a raw-contact insert followed by data
//! inserts that point back at it. The engine never learns the new row id;
//! data inserts carry a [`RowRef::BackReference`] that the store resolves
//! while applying the batch.

use crate::model::{Account, ContactRecord};

/// Mimetype for structured-name data rows.
pub const MIME_NAME: &str = "vnd.contact/name";
/// Mimetype for phone data rows.
pub const MIME_PHONE: &str = "vnd.contact/phone";
/// Mimetype for email data rows.
pub const MIME_EMAIL: &str = "vnd.contact/email";

/// Reference to a raw-contact row from inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    /// An existing raw-contact row id.
    Id(i64),
    /// The row produced by operation `n` of the same batch.
    BackReference(usize),
}

/// Phone type tag stored alongside a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneType {
    Home,
    Mobile,
    Work,
    Other,
}

impl PhoneType {
    /// Integer code persisted in the store.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Home => 1,
            Self::Mobile => 2,
            Self::Work => 3,
            Self::Other => 7,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Home),
            2 => Some(Self::Mobile),
            3 => Some(Self::Work),
            7 => Some(Self::Other),
            _ => None,
        }
    }
}

/// Payload of a data-row insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValue {
    StructuredName { display_name: String },
    Phone { number: String, kind: PhoneType },
    Email { address: String },
}

impl DataValue {
    #[must_use]
    pub const fn mimetype(&self) -> &'static str {
        match self {
            Self::StructuredName { .. } => MIME_NAME,
            Self::Phone { .. } => MIME_PHONE,
            Self::Email { .. } => MIME_EMAIL,
        }
    }

    /// Text value (`data1`).
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::StructuredName { display_name } => display_name,
            Self::Phone { number, .. } => number,
            Self::Email { address } => address,
        }
    }

    /// Type code (`data2`), only set for phones.
    #[must_use]
    pub const fn type_code(&self) -> Option<i64> {
        match self {
            Self::Phone { kind, .. } => Some(kind.code()),
            _ => None,
        }
    }
}

/// A single store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Create a top-level contact with one raw row. `None` means local-only.
    InsertRawContact { account: Option<Account> },
    /// Attach a data row to a raw contact.
    InsertData { raw_contact: RowRef, value: DataValue },
}

/// Build the ordered mutation batch for one record.
///
/// Operation 0 always creates the raw contact; every following operation
/// back-references it. Order: name (only when non-empty), phones, emails.
#[must_use]
pub fn build_batch(record: &ContactRecord) -> Vec<Mutation> {
    let mut ops = Vec::with_capacity(2 + record.phones.len() + record.emails.len());
    ops.push(Mutation::InsertRawContact { account: None });

    let owner = RowRef::BackReference(0);

    if let Some(name) = record.importable_name() {
        ops.push(Mutation::InsertData {
            raw_contact: owner,
            value: DataValue::StructuredName {
                display_name: name.to_string(),
            },
        });
    }

    for number in &record.phones {
        ops.push(Mutation::InsertData {
            raw_contact: owner,
            value: DataValue::Phone {
                number: number.clone(),
                kind: PhoneType::Mobile,
            },
        });
    }

    for address in &record.emails {
        ops.push(Mutation::InsertData {
            raw_contact: owner,
            value: DataValue::Email {
                address: address.clone(),
            },
        });
    }

    ops
}
