//! iCalendar export.
//!
//! Produces RFC 5545 text for a selection of events.

mod generate;

pub use generate::{ExportOptions, export_filename, generate_ics};
