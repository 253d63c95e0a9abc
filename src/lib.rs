//! `sheet2json` reads one named sheet of a spreadsheet workbook and writes its rows as a JSON array
//! of objects ("records" orientation): one object per data row, keyed by the sheet's header row.
//!
//! The primary entrypoint is [`convert::convert_file`]. With [`convert::ConvertOptions::default`]
//! it reads the sheet `Kehitysehdotukset` and writes `parsed_excel.json` in the working directory;
//! both are plain options.
//!
//! ## What you can read
//!
//! **Workbook formats (detected by extension):** `.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`
//!
//! **Cell values:** cells become [`types::Value`]s and serialize as follows:
//!
//! - integers (and floats with no fractional part) → JSON integers
//! - other numbers → JSON numbers
//! - booleans → JSON booleans
//! - text → JSON strings
//! - dates → ISO-8601 strings (`2024-05-01T00:00:00.000`)
//! - empty cells, error cells (`#DIV/0!`, ...) → missing, written per [`export::MissingCellPolicy`]
//!
//! ## Quick example
//!
//! ```no_run
//! use sheet2json::convert::{convert_file, ConvertOptions};
//!
//! # fn main() -> Result<(), sheet2json::ConvertError> {
//! let stats = convert_file("data.xlsx", &ConvertOptions::default())?;
//! println!("rows={} columns={}", stats.rows, stats.columns);
//! # Ok(())
//! # }
//! ```
//!
//! Reading and writing are also available separately:
//!
//! ```no_run
//! use sheet2json::export::{records_to_json, ExportOptions, MissingCellPolicy};
//! use sheet2json::ingestion::read_sheet;
//!
//! # fn main() -> Result<(), sheet2json::ConvertError> {
//! let table = read_sheet("data.xlsx", "Kehitysehdotukset")?;
//! let opts = ExportOptions {
//!     missing_cells: MissingCellPolicy::Omit,
//!     pretty: true,
//! };
//! println!("{}", records_to_json(&table, &opts)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`convert`]: conversion entrypoints, options and observers
//! - [`ingestion`]: reading a sheet (or a records JSON document) into a [`types::Table`]
//! - [`export`]: records-orientation JSON output
//! - [`types`]: in-memory table types
//! - [`error`]: error types

pub mod convert;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod types;

pub use error::{ConvertError, ConvertResult};
