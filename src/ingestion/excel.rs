//! Workbook reading.
//!
//! Supported inputs: `.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods` (format chosen from the extension).

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::types::{Table, Value};

/// Options controlling how sheet rows are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Drop data rows whose cells are all empty.
    pub skip_empty_rows: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { skip_empty_rows: true }
    }
}

/// Read a single named sheet into an in-memory [`Table`] using [`ReadOptions::default`].
pub fn read_sheet(path: impl AsRef<Path>, sheet_name: &str) -> ConvertResult<Table> {
    read_sheet_with_options(path, sheet_name, &ReadOptions::default())
}

/// Read a single named sheet into an in-memory [`Table`].
///
/// Behavior:
/// - Fails with [`ConvertError::FileNotFound`] if `path` does not exist
/// - Fails with [`ConvertError::SheetNotFound`] unless a sheet is named exactly `sheet_name`
/// - Uses the first non-empty row as the header row
/// - Reads remaining rows in order and converts cells into [`Value`]s
pub fn read_sheet_with_options(
    path: impl AsRef<Path>,
    sheet_name: &str,
    options: &ReadOptions,
) -> ConvertResult<Table> {
    let path = path.as_ref();
    let mut workbook = open(path)?;

    let available = workbook.sheet_names();
    if !available.iter().any(|s| s == sheet_name) {
        return Err(ConvertError::SheetNotFound {
            sheet: sheet_name.to_string(),
            available,
        });
    }

    let range = workbook.worksheet_range(sheet_name)?;
    debug!(
        sheet = sheet_name,
        height = range.height(),
        width = range.width(),
        "loaded sheet range"
    );
    Ok(table_from_range(&range, options))
}

/// List sheet names in workbook order.
pub fn sheet_names(path: impl AsRef<Path>) -> ConvertResult<Vec<String>> {
    Ok(open(path.as_ref())?.sheet_names())
}

fn open(path: &Path) -> ConvertResult<Sheets<std::io::BufReader<std::fs::File>>> {
    if !path.exists() {
        return Err(ConvertError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(open_workbook_auto(path)?)
}

/// Convert a cell range into a [`Table`].
///
/// An empty range (or one with no non-empty row) becomes a table with no columns and no rows.
/// Columns are counted from column `A`: when the used range starts further right, the leading
/// columns are kept as empty `Unnamed: <idx>` columns.
pub fn table_from_range(range: &Range<Data>, options: &ReadOptions) -> Table {
    let Some((header_row_idx, header)) = find_header(range) else {
        return Table::default();
    };
    let col_offset = range.start().map_or(0, |(_, col)| col as usize);

    let mut raw_headers = vec![String::new(); col_offset];
    raw_headers.extend(header);
    let columns = normalize_headers(raw_headers);

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row in range.rows().skip(header_row_idx + 1) {
        let mut out_row: Vec<Value> = vec![Value::Null; col_offset];
        out_row.reserve(columns.len() - col_offset);
        for col_idx in 0..columns.len() - col_offset {
            out_row.push(convert_cell(row.get(col_idx).unwrap_or(&Data::Empty)));
        }
        if options.skip_empty_rows && out_row.iter().all(Value::is_null) {
            continue;
        }
        rows.push(out_row);
    }

    Table::new(columns, rows)
}

fn find_header(range: &Range<Data>) -> Option<(usize, Vec<String>)> {
    range
        .rows()
        .enumerate()
        .find(|(_, row)| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(idx0, row)| (idx0, row.iter().map(cell_to_header_string).collect()))
}

/// Name blank headers `Unnamed: <idx>` and suffix duplicates with `.1`, `.2`, ...
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut out: Vec<String> = Vec::with_capacity(raw.len());

    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 0usize;
        while used.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}.{suffix}");
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => match integral_f64(*f) {
            Some(i) => i.to_string(),
            None => f.to_string(),
        },
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match convert_cell(c) {
            Value::DateTime(s) => s,
            _ => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// Map a workbook cell to a [`Value`].
pub(crate) fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => float_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::Utf8(s.clone()),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return float_value(dt.as_f64());
            }
            match dt.as_datetime() {
                Some(ndt) => Value::DateTime(iso_datetime(&ndt)),
                None => float_value(dt.as_f64()),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmm`
fn iso_datetime(ndt: &NaiveDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
        ndt.year(),
        ndt.month(),
        ndt.day(),
        ndt.hour(),
        ndt.minute(),
        ndt.second(),
        ndt.nanosecond() / 1_000_000
    )
}

fn float_value(f: f64) -> Value {
    if !f.is_finite() {
        return Value::Null;
    }
    match integral_f64(f) {
        Some(i) => Value::Int64(i),
        None => Value::Float64(f),
    }
}

fn integral_f64(f: f64) -> Option<i64> {
    // i64::MAX is not exactly representable; stay strictly below 2^63.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f.fract() == 0.0 && f >= -LIMIT && f < LIMIT {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

    use super::*;

    fn range_from(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height.saturating_sub(1), width.saturating_sub(1)));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn integral_floats_become_integers() {
        assert_eq!(convert_cell(&Data::Float(1.0)), Value::Int64(1));
        assert_eq!(convert_cell(&Data::Float(-3.0)), Value::Int64(-3));
        assert_eq!(convert_cell(&Data::Float(2.5)), Value::Float64(2.5));
        assert_eq!(convert_cell(&Data::Float(f64::NAN)), Value::Null);
        assert_eq!(convert_cell(&Data::Float(1e300)), Value::Float64(1e300));
    }

    #[test]
    fn empty_and_error_cells_are_null() {
        assert_eq!(convert_cell(&Data::Empty), Value::Null);
        assert_eq!(convert_cell(&Data::Error(CellErrorType::Div0)), Value::Null);
        assert_eq!(convert_cell(&Data::Bool(true)), Value::Bool(true));
        assert_eq!(convert_cell(&s(" padded ")), Value::Utf8(" padded ".to_string()));
    }

    #[test]
    fn blank_and_duplicate_headers_are_renamed() {
        let headers = normalize_headers(vec![
            "A".to_string(),
            String::new(),
            "A".to_string(),
            "A".to_string(),
            "A.1".to_string(),
        ]);
        assert_eq!(headers, vec!["A", "Unnamed: 1", "A.1", "A.2", "A.1.1"]);
    }

    #[test]
    fn header_is_first_non_empty_row() {
        let range = range_from(vec![
            vec![Data::Empty, Data::Empty],
            vec![s("ID"), s("Proposal")],
            vec![Data::Float(1.0), s("Improve signage")],
        ]);
        let table = table_from_range(&range, &ReadOptions::default());
        assert_eq!(table.columns, vec!["ID", "Proposal"]);
        assert_eq!(
            table.rows,
            vec![vec![Value::Int64(1), Value::Utf8("Improve signage".to_string())]]
        );
    }

    #[test]
    fn empty_rows_are_skipped_unless_requested() {
        let range = range_from(vec![
            vec![s("a"), s("b")],
            vec![Data::Int(1), Data::Empty],
            vec![Data::Empty, Data::Empty],
            vec![Data::Empty, s("x")],
        ]);

        let skipped = table_from_range(&range, &ReadOptions::default());
        assert_eq!(skipped.row_count(), 2);
        assert_eq!(skipped.rows[1][1], Value::Utf8("x".to_string()));

        let kept = table_from_range(&range, &ReadOptions { skip_empty_rows: false });
        assert_eq!(kept.row_count(), 3);
        assert!(kept.rows[1].iter().all(Value::is_null));
    }

    #[test]
    fn empty_range_yields_empty_table() {
        let range: Range<Data> = Range::empty();
        let table = table_from_range(&range, &ReadOptions::default());
        assert_eq!(table, Table::default());
    }

    #[test]
    fn numeric_headers_render_without_fraction() {
        let range = range_from(vec![vec![Data::Float(2024.0), Data::Float(1.5)]]);
        let table = table_from_range(&range, &ReadOptions::default());
        assert_eq!(table.columns, vec!["2024", "1.5"]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn date_cells_render_as_iso_text() {
        // 45413 is 2024-05-01 in the 1900 date system.
        let noon = Data::DateTime(ExcelDateTime::new(45413.5, ExcelDateTimeType::DateTime, false));
        assert_eq!(convert_cell(&noon), Value::DateTime("2024-05-01T12:00:00.000".to_string()));

        let range = range_from(vec![vec![noon.clone()], vec![Data::Int(1)]]);
        let table = table_from_range(&range, &ReadOptions::default());
        assert_eq!(table.columns, vec!["2024-05-01T12:00:00.000"]);
    }

    #[test]
    fn duration_cells_keep_their_serial_value() {
        let span = Data::DateTime(ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false));
        assert_eq!(convert_cell(&span), Value::Float64(1.5));

        let whole_day = Data::DateTime(ExcelDateTime::new(2.0, ExcelDateTimeType::TimeDelta, false));
        assert_eq!(convert_cell(&whole_day), Value::Int64(2));
    }

    #[test]
    fn columns_count_from_column_a() {
        // Used range B1:D2, with C1 blank.
        let mut range: Range<Data> = Range::new((0, 1), (1, 3));
        range.set_value((0, 1), s("When"));
        range.set_value((0, 3), s("X"));
        range.set_value((1, 1), Data::Int(1));
        range.set_value((1, 2), Data::Int(5));
        range.set_value((1, 3), Data::Int(7));

        let table = table_from_range(&range, &ReadOptions::default());
        assert_eq!(table.columns, vec!["Unnamed: 0", "When", "Unnamed: 2", "X"]);
        assert_eq!(
            table.rows,
            vec![vec![Value::Null, Value::Int64(1), Value::Int64(5), Value::Int64(7)]]
        );
    }
}
