use std::{fs::read_to_string, path::Path};

use serde_json::{Value, error::Category};

use crate::error::{ReportError, ReportResult};

pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn read_report(path: &Path) -> ReportResult<String> {
    read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_json(content: &str) -> ReportResult<Value> {
    serde_json::from_str(content).map_err(json_error)
}

/// Maps a serde_json failure onto the parse error kinds
pub fn json_error(err: serde_json::Error) -> ReportError {
    match err.classify() {
        Category::Data if err.to_string().starts_with("missing field") => {
            ReportError::missing_field(err.to_string())
        }
        Category::Data => ReportError::type_mismatch(err.to_string()),
        Category::Io | Category::Syntax | Category::Eof => {
            ReportError::syntax(format!("invalid json: {err}"))
        }
    }
}

/// Walks `path` through nested objects
pub fn json_field<'a>(value: &'a Value, path: &[&str]) -> ReportResult<&'a Value> {
    let mut current = value;
    for (depth, key) in path.iter().enumerate() {
        current = current.get(key).ok_or_else(|| {
            ReportError::missing_field(format!("missing {}", path[..=depth].join(".")))
        })?;
    }
    Ok(current)
}

pub fn json_f64(value: &Value, path: &[&str]) -> ReportResult<f64> {
    let field = json_field(value, path)?;
    field.as_f64().ok_or_else(|| {
        ReportError::type_mismatch(format!("{} is not a number: {field}", path.join(".")))
    })
}

/// Parses a numeric token taken out of free-form text
pub fn parse_number(token: &str, what: &str) -> ReportResult<f64> {
    token
        .trim()
        .parse::<f64>()
        .map_err(|_| ReportError::type_mismatch(format!("{what}: {token:?} is not a number")))
}
