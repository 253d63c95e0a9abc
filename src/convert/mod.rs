//! Conversion entrypoints and observability hooks.
//!
//! Most callers should use [`convert_file`] (from [`pipeline`]) which:
//!
//! - reads one named sheet into an in-memory [`crate::types::Table`]
//! - serializes it as a records-orientation JSON array
//! - writes the text to the configured output path
//! - optionally reports success/failure/alerts to a [`ConversionObserver`]

pub mod observability;
pub mod pipeline;

pub use observability::{
    CompositeObserver, ConversionContext, ConversionObserver, ConversionSeverity, ConversionStats,
    FileObserver, TracingObserver,
};
pub use pipeline::{
    convert_file, convert_to_string, to_json, ConversionRequest, ConvertOptions, DEFAULT_INPUT_PATH,
    DEFAULT_OUTPUT_PATH, DEFAULT_SHEET_NAME,
};
