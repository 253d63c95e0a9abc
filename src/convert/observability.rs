use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ConvertError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConversionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (conversion failed on bad input).
    Error,
    /// Critical error (missing input, unwritable output, other I/O failures).
    Critical,
}

impl ConversionSeverity {
    /// Classify a conversion error.
    pub fn for_error(e: &ConvertError) -> Self {
        match e {
            ConvertError::FileNotFound { .. } | ConvertError::Write { .. } | ConvertError::Io(_) => {
                ConversionSeverity::Critical
            }
            ConvertError::SheetNotFound { .. }
            | ConvertError::Parse(_)
            | ConvertError::InvalidInput { .. }
            | ConvertError::Json(_) => ConversionSeverity::Error,
        }
    }
}

/// Context about a conversion attempt.
#[derive(Debug, Clone)]
pub struct ConversionContext {
    /// The input workbook path.
    pub input: PathBuf,
    /// The sheet being converted.
    pub sheet: String,
    /// Output path, when the conversion writes a file.
    pub output: Option<PathBuf>,
}

/// Stats reported on successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionStats {
    /// Number of records written (data rows, header excluded).
    pub rows: usize,
    /// Number of columns (record keys).
    pub columns: usize,
    /// Size of the JSON text in bytes.
    pub bytes_written: usize,
}

/// Observer interface for conversion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ConversionObserver: Send + Sync {
    /// Called when conversion succeeds.
    fn on_success(&self, _ctx: &ConversionContext, _stats: ConversionStats) {}

    /// Called when conversion fails.
    fn on_failure(&self, _ctx: &ConversionContext, _severity: ConversionSeverity, _error: &ConvertError) {}

    /// Called when a conversion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ConversionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ConversionObserver>>) -> Self {
        Self { observers }
    }

    /// Number of wrapped observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` if no observers are wrapped.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ConversionObserver for CompositeObserver {
    fn on_success(&self, ctx: &ConversionContext, stats: ConversionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits conversion events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ConversionObserver for TracingObserver {
    fn on_success(&self, ctx: &ConversionContext, stats: ConversionStats) {
        tracing::info!(
            input = %ctx.input.display(),
            sheet = %ctx.sheet,
            output = %display_output(ctx),
            rows = stats.rows,
            columns = stats.columns,
            bytes = stats.bytes_written,
            "sheet converted"
        );
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        tracing::error!(
            input = %ctx.input.display(),
            sheet = %ctx.sheet,
            severity = ?severity,
            error = %error,
            "sheet conversion failed"
        );
    }

    // Failures are already logged at error level.
    fn on_alert(&self, _ctx: &ConversionContext, _severity: ConversionSeverity, _error: &ConvertError) {}
}

/// Appends conversion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ConversionObserver for FileObserver {
    fn on_success(&self, ctx: &ConversionContext, stats: ConversionStats) {
        self.append_line(&format!(
            "{} ok input={} sheet={} output={} rows={} columns={} bytes={}",
            unix_ts(),
            ctx.input.display(),
            ctx.sheet,
            display_output(ctx),
            stats.rows,
            stats.columns,
            stats.bytes_written
        ));
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        self.append_line(&format!(
            "{} fail severity={:?} input={} sheet={} err={}",
            unix_ts(),
            severity,
            ctx.input.display(),
            ctx.sheet,
            error
        ));
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} input={} sheet={} err={}",
            unix_ts(),
            severity,
            ctx.input.display(),
            ctx.sheet,
            error
        ));
    }
}

fn display_output(ctx: &ConversionContext) -> String {
    ctx.output
        .as_ref()
        .map_or_else(|| "-".to_string(), |p| p.display().to_string())
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_are_critical() {
        let missing = ConvertError::FileNotFound {
            path: PathBuf::from("data.xlsx"),
        };
        assert_eq!(ConversionSeverity::for_error(&missing), ConversionSeverity::Critical);

        let sheet = ConvertError::SheetNotFound {
            sheet: "Kehitysehdotukset".to_string(),
            available: vec!["Sheet1".to_string()],
        };
        assert_eq!(ConversionSeverity::for_error(&sheet), ConversionSeverity::Error);
        assert!(ConversionSeverity::Critical > ConversionSeverity::Error);
    }

    #[test]
    fn file_observer_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("convert.log");
        let obs = FileObserver::new(&log);
        let ctx = ConversionContext {
            input: PathBuf::from("data.xlsx"),
            sheet: "Kehitysehdotukset".to_string(),
            output: Some(PathBuf::from("parsed_excel.json")),
        };

        obs.on_success(
            &ctx,
            ConversionStats {
                rows: 3,
                columns: 2,
                bytes_written: 10,
            },
        );
        let err = ConvertError::FileNotFound {
            path: PathBuf::from("data.xlsx"),
        };
        obs.on_alert(&ctx, ConversionSeverity::Critical, &err);

        let text = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ok input=data.xlsx sheet=Kehitysehdotukset output=parsed_excel.json rows=3"));
        assert!(lines[1].contains("ALERT severity=Critical"));
    }
}
