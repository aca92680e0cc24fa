pub mod calendar;
pub mod categories;
pub mod config;
pub mod export;
pub mod list;
pub mod timeline;

use anyhow::Result;
use serde::Serialize;

/// Print a view as pretty JSON for scripting.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
