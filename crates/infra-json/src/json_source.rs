// JSON file RecordSource
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use warden_core::domain::RawRecord;
use warden_core::error::{AppError, Result};
use warden_core::port::RecordSource;

/// Reads a JSON array of reservation objects on every fetch
///
/// A file containing `null` yields no snapshot (treated as empty by callers).
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn fetch(&self) -> Result<Option<Vec<RawRecord>>> {
        let content = fs::read_to_string(&self.path)?;
        let records = parse_snapshot(&content)?;

        debug!(
            path = %self.path.display(),
            records = records.as_ref().map_or(0, Vec::len),
            "Snapshot loaded"
        );
        Ok(records)
    }
}

fn parse_snapshot(content: &str) -> Result<Option<Vec<RawRecord>>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(AppError::Source(format!(
                    "entry {} is not an object: {}",
                    index, other
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        other => Err(AppError::Source(format!(
            "expected a JSON array of records, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
