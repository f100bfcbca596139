//! Contacts transfer - bulk export and import of an address book
//!
//! This crate provides the core functionality for the `ct` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (`ContactRecord`, `ContactId`, `Account`)
//! - [`storage`] - SQLite address-book store
//! - [`transfer`] - Line-oriented export/import engine
//! - [`config`] - Path resolution
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod transfer;

pub use error::{Error, Result};
