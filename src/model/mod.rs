//! Data model types.
//!
//! This module contains the transfer unit and the identifiers that only
//! live on the store side of a transfer.

mod contact;

pub use contact::{Account, ContactId, ContactRecord};
