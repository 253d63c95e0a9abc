//! Core data model types.
//!
//! A sheet is read into an in-memory [`Table`]: the header row becomes the ordered column list and
//! every data row becomes a `Vec<Value>` in the same column order. [`Record`] is a borrowed,
//! name-keyed view of one row, which is what gets serialized in records orientation.

/// A single cell value in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value (empty cells, error cells, non-finite numbers).
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Date/time rendered as ISO-8601 text.
    DateTime(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>`; every row has exactly `columns.len()` values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names, in sheet order.
    pub columns: Vec<String>,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from column names and rows.
    ///
    /// # Panics
    ///
    /// Panics if any row length differs from the number of columns.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let expected_len = columns.len();
        for row in &rows {
            assert!(
                row.len() == expected_len,
                "row length {} does not match column count {}",
                row.len(),
                expected_len
            );
        }
        Self { columns, rows }
    }

    /// Number of data rows (the header is not counted).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate rows as name-keyed [`Record`]s, in row order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|values| Record {
            columns: &self.columns,
            values,
        })
    }
}

/// Borrowed view of one table row, keyed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Record<'a> {
    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// Iterate `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["ID".to_string(), "Proposal".to_string()],
            vec![
                vec![Value::Int64(1), Value::Utf8("Improve signage".to_string())],
                vec![Value::Int64(2), Value::Null],
            ],
        )
    }

    #[test]
    fn records_follow_row_and_column_order() {
        let table = sample();
        let records: Vec<Record<'_>> = table.records().collect();
        assert_eq!(records.len(), 2);

        let keys: Vec<&str> = records[0].iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["ID", "Proposal"]);
        assert_eq!(records[1].get("ID"), Some(&Value::Int64(2)));
        assert_eq!(records[1].get("Proposal"), Some(&Value::Null));
        assert_eq!(records[1].get("missing"), None);
    }

    #[test]
    fn index_of_finds_columns() {
        let table = sample();
        assert_eq!(table.index_of("Proposal"), Some(1));
        assert_eq!(table.index_of("nope"), None);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    #[should_panic(expected = "does not match column count")]
    fn new_rejects_ragged_rows() {
        let _ = Table::new(vec!["a".to_string()], vec![vec![Value::Null, Value::Null]]);
    }
}
