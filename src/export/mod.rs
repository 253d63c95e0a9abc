//! Writing a [`crate::types::Table`] out.

pub mod json;

pub use json::{records_to_json, records_to_value, write_records, ExportOptions, MissingCellPolicy};
