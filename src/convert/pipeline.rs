//! Sheet-to-JSON conversion entrypoints.
//!
//! Most callers should use [`convert_file`], which reads one sheet of a workbook into an in-memory
//! [`crate::types::Table`], serializes it as records-orientation JSON, and writes the text to
//! [`ConvertOptions::output_path`].
//!
//! - The sheet name and output path default to [`DEFAULT_SHEET_NAME`] and [`DEFAULT_OUTPUT_PATH`].
//! - If a [`ConversionObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::export::json::{self as export, ExportOptions, MissingCellPolicy};
use crate::ingestion::excel::{self, ReadOptions};
use crate::types::Table;

use super::observability::{ConversionContext, ConversionObserver, ConversionSeverity, ConversionStats};

/// Sheet read when no other name is given.
pub const DEFAULT_SHEET_NAME: &str = "Kehitysehdotukset";

/// Output file written when no other path is given (relative to the working directory).
pub const DEFAULT_OUTPUT_PATH: &str = "parsed_excel.json";

/// Input workbook used by the command-line tool when no path is given.
pub const DEFAULT_INPUT_PATH: &str = "data.xlsx";

/// Options controlling conversion behavior.
///
/// Use [`Default`] for the common case.
#[derive(Clone)]
pub struct ConvertOptions {
    /// Exact name of the sheet to convert.
    pub sheet_name: String,
    /// Where [`convert_file`] writes the JSON document.
    pub output_path: PathBuf,
    /// How empty cells are written.
    pub missing_cells: MissingCellPolicy,
    /// Drop data rows whose cells are all empty.
    pub skip_empty_rows: bool,
    /// Indent the JSON output.
    pub pretty: bool,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ConversionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ConversionSeverity,
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("sheet_name", &self.sheet_name)
            .field("output_path", &self.output_path)
            .field("missing_cells", &self.missing_cells)
            .field("skip_empty_rows", &self.skip_empty_rows)
            .field("pretty", &self.pretty)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            missing_cells: MissingCellPolicy::default(),
            skip_empty_rows: true,
            pretty: false,
            observer: None,
            alert_at_or_above: ConversionSeverity::Critical,
        }
    }
}

impl ConvertOptions {
    fn read_options(&self) -> ReadOptions {
        ReadOptions {
            skip_empty_rows: self.skip_empty_rows,
        }
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            missing_cells: self.missing_cells,
            pretty: self.pretty,
        }
    }
}

/// Convert the default sheet of `path` and write [`DEFAULT_OUTPUT_PATH`].
///
/// Equivalent to `convert_file(path, &ConvertOptions::default())`.
pub fn to_json(path: impl AsRef<Path>) -> ConvertResult<ConversionStats> {
    convert_file(path, &ConvertOptions::default())
}

/// Read `options.sheet_name` from the workbook at `path` and write its rows as JSON to
/// `options.output_path`, creating or replacing that file.
///
/// The output file is only touched once the whole sheet has been read and serialized, and it is
/// replaced through a temporary file renamed into place. A failed conversion never leaves an
/// empty or partial output file behind.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column/byte stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use sheet2json::convert::{convert_file, ConvertOptions};
///
/// # fn main() -> Result<(), sheet2json::ConvertError> {
/// let opts = ConvertOptions {
///     sheet_name: "Sheet1".to_string(),
///     output_path: "out/sheet1.json".into(),
///     ..Default::default()
/// };
/// let stats = convert_file("workbook.xlsx", &opts)?;
/// println!("rows={}", stats.rows);
/// # Ok(())
/// # }
/// ```
pub fn convert_file(path: impl AsRef<Path>, options: &ConvertOptions) -> ConvertResult<ConversionStats> {
    let path = path.as_ref();
    let ctx = ConversionContext {
        input: path.to_path_buf(),
        sheet: options.sheet_name.clone(),
        output: Some(options.output_path.clone()),
    };

    let result = read_and_serialize(path, options).and_then(|(table, text)| {
        export::write_text(&options.output_path, &text)?;
        Ok(stats_for(&table, &text))
    });

    match &result {
        Ok(stats) => notify_success(options, &ctx, *stats),
        Err(e) => notify_failure(options, &ctx, e),
    }
    result
}

/// Read `options.sheet_name` from the workbook at `path` and return the JSON text without
/// writing anything. `options.output_path` is ignored.
pub fn convert_to_string(path: impl AsRef<Path>, options: &ConvertOptions) -> ConvertResult<String> {
    let path = path.as_ref();
    let ctx = ConversionContext {
        input: path.to_path_buf(),
        sheet: options.sheet_name.clone(),
        output: None,
    };

    let result = read_and_serialize(path, options);
    match &result {
        Ok((table, text)) => notify_success(options, &ctx, stats_for(table, text)),
        Err(e) => notify_failure(options, &ctx, e),
    }
    result.map(|(_, text)| text)
}

fn read_and_serialize(path: &Path, options: &ConvertOptions) -> ConvertResult<(Table, String)> {
    let table = excel::read_sheet_with_options(path, &options.sheet_name, &options.read_options())?;
    debug!(
        columns = ?table.columns,
        rows = table.row_count(),
        "read sheet '{}'",
        options.sheet_name
    );
    let text = export::records_to_json(&table, &options.export_options())?;
    Ok((table, text))
}

fn stats_for(table: &Table, text: &str) -> ConversionStats {
    ConversionStats {
        rows: table.row_count(),
        columns: table.column_count(),
        bytes_written: text.len(),
    }
}

fn notify_success(options: &ConvertOptions, ctx: &ConversionContext, stats: ConversionStats) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_success(ctx, stats);
    }
}

fn notify_failure(options: &ConvertOptions, ctx: &ConversionContext, e: &ConvertError) {
    if let Some(obs) = options.observer.as_ref() {
        let sev = ConversionSeverity::for_error(e);
        obs.on_failure(ctx, sev, e);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, e);
        }
    }
}

/// Owned conversion request.
///
/// Useful when the input path and options are assembled in one place (e.g. from CLI arguments)
/// and executed in another.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Path to the input workbook.
    pub input: PathBuf,
    /// Options controlling conversion.
    pub options: ConvertOptions,
}

impl ConversionRequest {
    /// Create a request with default options.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            options: ConvertOptions::default(),
        }
    }

    /// Execute the request by calling [`convert_file`].
    pub fn run(&self) -> ConvertResult<ConversionStats> {
        convert_file(&self.input, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.sheet_name, "Kehitysehdotukset");
        assert_eq!(opts.output_path, PathBuf::from("parsed_excel.json"));
        assert_eq!(opts.missing_cells, MissingCellPolicy::Null);
        assert!(opts.skip_empty_rows);
        assert!(!opts.pretty);
        assert!(opts.observer.is_none());
    }

    #[test]
    fn debug_hides_observer_object() {
        let text = format!("{:?}", ConvertOptions::default());
        assert!(text.contains("observer_set: false"));
    }

    #[test]
    fn missing_input_does_not_create_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");
        let opts = ConvertOptions {
            output_path: out.clone(),
            ..Default::default()
        };
        let err = convert_file(dir.path().join("nope.xlsx"), &opts).unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound { .. }));
        assert!(!out.exists());
    }
}
