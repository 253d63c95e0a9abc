//! Records-orientation JSON loading.
//!
//! Supported input: a JSON array of objects, `[{"a":1}, {"a":2}]`. Columns are collected from the
//! object keys in first-seen order; a key missing from some object reads as [`Value::Null`].

use std::fs;
use std::path::Path;

use crate::error::{ConvertError, ConvertResult};
use crate::types::{Table, Value};

/// Load a records-orientation JSON file into an in-memory [`Table`].
pub fn read_records_from_path(path: impl AsRef<Path>) -> ConvertResult<Table> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConvertError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ConvertError::Io(e),
    })?;
    read_records_from_str(&text)
}

/// Load records-orientation JSON from an in-memory string into a [`Table`].
pub fn read_records_from_str(input: &str) -> ConvertResult<Table> {
    let items = match serde_json::from_str::<serde_json::Value>(input)? {
        serde_json::Value::Array(items) => items,
        _ => {
            return Err(ConvertError::InvalidInput {
                message: "json must be an array of objects".to_string(),
            });
        }
    };

    let mut objects = Vec::with_capacity(items.len());
    for (idx0, item) in items.iter().enumerate() {
        let obj = item.as_object().ok_or_else(|| ConvertError::InvalidInput {
            message: format!("row {} is not a json object", idx0 + 1),
        })?;
        objects.push(obj);
    }

    let mut columns: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = objects
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|c| obj.get(c).map_or(Value::Null, convert_json_value))
                .collect()
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map_or(Value::Null, Value::Float64),
        },
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        nested => Value::Utf8(nested.to_string()),
    }
}
