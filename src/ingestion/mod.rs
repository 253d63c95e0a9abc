//! Reading tabular data into an in-memory [`crate::types::Table`].
//!
//! - [`excel`]: one named sheet of a workbook (`.xlsx`, `.xls`, `.ods`, ...)
//! - [`json`]: a records-orientation JSON document, e.g. one produced by [`crate::export::json`]

pub mod excel;
pub mod json;

pub use excel::{read_sheet, read_sheet_with_options, sheet_names, ReadOptions};
pub use json::{read_records_from_path, read_records_from_str};
