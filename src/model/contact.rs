//! Canonical contact record and store identifiers.
//!
//! `ContactRecord` is the transfer unit: one line of a transfer file decodes
//! into exactly one record, and export assembles exactly one record per
//! unique top-level contact. It carries no identity of its own.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Store-side handle for a top-level contact.
///
/// Only meaningful while talking to the store during export. Never written
/// to a transfer file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account a raw contact row is bound to.
///
/// Imported records are always local-only (no account).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_type: String,
    pub account_name: String,
}

impl Account {
    #[must_use]
    pub fn new(account_type: &str, account_name: &str) -> Self {
        Self {
            account_type: account_type.to_string(),
            account_name: account_name.to_string(),
        }
    }
}

/// Flattened, store-independent contact.
///
/// Serialized form:
/// `{"displayName":"Ann","phones":["555-1111"],"emails":[]}`
///
/// An absent display name is written as `null`, never as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    /// Display label. `None` is distinct from `Some("")`.
    pub display_name: Option<String>,

    /// Phone numbers in store order. Duplicates are kept.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phones: Vec<String>,

    /// Email addresses in store order. Duplicates are kept.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub emails: Vec<String>,

    /// Reserved. Not part of the current line format.
    #[serde(skip)]
    pub notes: Option<String>,
}

impl ContactRecord {
    /// Build a record with a display name and no sub-fields.
    #[must_use]
    pub fn named(display_name: &str) -> Self {
        Self {
            display_name: Some(display_name.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_phones<I, S>(mut self, phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phones = phones.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_emails<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emails = emails.into_iter().map(Into::into).collect();
        self
    }

    /// The display name to write into the store, if any.
    ///
    /// Empty names are treated the same as absent ones on import.
    #[must_use]
    pub fn importable_name(&self) -> Option<&str> {
        self.display_name.as_deref().filter(|name| !name.is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
