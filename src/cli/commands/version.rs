//! Version command implementation.

use crate::error::Result;
use crate::storage::schema::CURRENT_SCHEMA_VERSION;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput {
    version: &'static str,
    build: &'static str,
    schema_version: i32,
}

/// Print the crate version, build profile and database schema version.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) { "dev" } else { "release" },
        schema_version: CURRENT_SCHEMA_VERSION,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "ct version {} ({}, schema v{})",
            output.version, output.build, output.schema_version
        );
    }
    Ok(())
}
