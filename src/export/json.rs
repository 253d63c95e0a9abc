//! Records-orientation JSON export.
//!
//! A [`Table`] becomes `[{col1: val1, col2: val2, ...}, ...]`: one object per row, fields in column
//! order. Missing cells follow [`MissingCellPolicy`].

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::{Map, Number, Value as JsonValue};
use tempfile::NamedTempFile;

use crate::error::{ConvertError, ConvertResult};
use crate::types::{Record, Table, Value};

/// How a missing cell ([`Value::Null`]) is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MissingCellPolicy {
    /// Emit `null` (default).
    #[default]
    Null,
    /// Emit an empty string `""`.
    EmptyString,
    /// Leave the key out of the record.
    Omit,
}

/// Options controlling JSON export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Missing cell handling.
    pub missing_cells: MissingCellPolicy,
    /// Indent the output instead of writing it on one line.
    pub pretty: bool,
}

/// Convert a table into a JSON array of objects.
pub fn records_to_value(table: &Table, missing_cells: MissingCellPolicy) -> JsonValue {
    JsonValue::Array(
        table
            .records()
            .map(|record| JsonValue::Object(record_to_object(&record, missing_cells)))
            .collect(),
    )
}

/// Serialize a table as records-orientation JSON text.
pub fn records_to_json(table: &Table, options: &ExportOptions) -> ConvertResult<String> {
    let value = records_to_value(table, options.missing_cells);
    let text = if options.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// Serialize a table and write it to `path`, creating or replacing the file.
///
/// See [`write_text`] for how the file is replaced. Returns the number of bytes written.
pub fn write_records(table: &Table, path: impl AsRef<Path>, options: &ExportOptions) -> ConvertResult<usize> {
    let text = records_to_json(table, options)?;
    write_text(path.as_ref(), &text)?;
    Ok(text.len())
}

/// Write `text` to `path` through a temporary file in the same directory, renamed into place once
/// fully written. A failed write leaves any existing file at `path` untouched.
///
/// A replaced file keeps its permissions; a new one gets the temporary file's (owner-only on Unix).
pub fn write_text(path: &Path, text: &str) -> ConvertResult<()> {
    let write_err = |source: std::io::Error| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions()).map_err(write_err)?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn record_to_object(record: &Record<'_>, missing_cells: MissingCellPolicy) -> Map<String, JsonValue> {
    let mut obj = Map::with_capacity(record.len());
    for (column, value) in record.iter() {
        let json = match (value, missing_cells) {
            (Value::Null, MissingCellPolicy::Omit) => continue,
            (Value::Null, MissingCellPolicy::EmptyString) => JsonValue::String(String::new()),
            (v, _) => value_to_json(v),
        };
        obj.insert(column.to_string(), json);
    }
    obj
}

fn value_to_json(v: &Value) -> JsonValue {
    match v {
        Value::Null => JsonValue::Null,
        Value::Int64(i) => JsonValue::from(*i),
        Value::Float64(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Utf8(s) | Value::DateTime(s) => JsonValue::String(s.clone()),
    }
}
