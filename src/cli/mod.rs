//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::transfer::FailurePolicy;

pub mod commands;

/// Bulk export and import of address-book contacts
#[derive(Parser, Debug)]
#[command(name = "ct", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.contacts-transfer/data/contacts.db)
    #[arg(long, global = true, env = "CT_DB")]
    pub db: Option<PathBuf>,

    /// Transfer directory (default: <downloads>/contacts-transfer)
    #[arg(long, global = true, env = "CT_TRANSFER_DIR")]
    pub dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every contact to a transfer file
    Export {
        /// File name or path (default: out.contacts in the transfer directory)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Import contacts from a transfer file
    Import {
        /// File name or path (default: in.contacts in the transfer directory)
        #[arg(long)]
        file: Option<PathBuf>,

        /// What to do when a line fails (continue, abort)
        #[arg(long, default_value_t = FailurePolicy::Continue)]
        on_error: FailurePolicy,
    },

    /// Delete every contact from the database
    DeleteAll {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// List contacts in the database
    List,

    /// Show database and transfer file status
    Status,

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
