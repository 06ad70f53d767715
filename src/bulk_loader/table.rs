use std::fs::File;
use std::path::Path;

use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::IngestError;

/// One CSV row keyed by header name, in header order.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellTyping {
    /// Numbers, booleans and empty cells become typed JSON values.
    #[default]
    Inferred,
    /// Every cell is passed through as a string.
    Strings,
}

/// Reads a delimited file with a header row into memory.
pub fn load_table(
    path: &Path,
    delimiter: u8,
    typing: CellTyping,
) -> Result<Vec<Record>, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(file);

    let headers = column_names(
        reader
            .headers()
            .map_err(|e| map_csv_error(path, e))?
            .iter(),
    );
    debug!("Columns in {:?}: {:?}", path, headers);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| map_csv_error(path, e))?;
        let mut record = Record::with_capacity(headers.len());
        for (name, cell) in headers.iter().zip(row.iter()) {
            let value = match typing {
                CellTyping::Inferred => infer_value(cell),
                CellTyping::Strings => Value::String(cell.to_string()),
            };
            record.insert(name.clone(), value);
        }
        records.push(record);
    }
    Ok(records)
}

/// Repeated header names get a `.1`, `.2`, ... suffix so no column is lost.
fn column_names<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in raw {
        let mut candidate = name.to_string();
        let mut n = 0;
        while names.contains(&candidate) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        names.push(candidate);
    }
    names
}

pub fn infer_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = cell.parse::<f64>() {
        // NaN and infinities have no JSON representation
        return Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null);
    }
    match cell.to_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(cell.to_string()),
    }
}

fn map_csv_error(path: &Path, err: csv::Error) -> IngestError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => IngestError::io(path, source),
        _ => IngestError::Parse(format!("{}: {}", path.display(), message)),
    }
}
