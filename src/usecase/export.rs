use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::domain::entities::record::{Record, Row, RowOrigin};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,
    #[error("failed to serialize row: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Flattens a row into ordered key/value pairs: `id` for database rows,
/// then the record fields, then `source`.
pub fn row_fields<T: Record>(row: &Row<T>) -> Result<Map<String, Value>, ExportError> {
    let mut fields = Map::new();
    if let RowOrigin::Database(id) = row.origin {
        fields.insert("id".to_string(), Value::from(id.0));
    }
    match serde_json::to_value(&row.record)? {
        Value::Object(record) => fields.extend(record),
        other => {
            fields.insert("value".to_string(), other);
        }
    }
    fields.insert(
        "source".to_string(),
        Value::String(row.origin.label().to_string()),
    );
    Ok(fields)
}

pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Writes every given row as CSV. Headers are the union of keys across
/// rows in first-seen order; every value is quoted.
pub fn write_csv<'a, T, W>(
    rows: impl IntoIterator<Item = &'a Row<T>>,
    mut out: W,
) -> Result<usize, ExportError>
where
    T: Record,
    W: Write,
{
    let flattened = rows
        .into_iter()
        .map(row_fields)
        .collect::<Result<Vec<_>, _>>()?;
    if flattened.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut seen = HashSet::new();
    let mut headers = Vec::new();
    for fields in &flattened {
        for key in fields.keys() {
            if seen.insert(key.as_str()) {
                headers.push(key.clone());
            }
        }
    }

    {
        let mut header_writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut out);
        header_writer.write_record(&headers)?;
        header_writer.flush().map_err(csv::Error::from)?;
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(&mut out);
    for fields in &flattened {
        writer.write_record(headers.iter().map(|key| cell_text(fields.get(key))))?;
    }
    writer.flush().map_err(csv::Error::from)?;

    Ok(flattened.len())
}

pub fn export_csv_to_path<'a, T: Record>(
    rows: impl IntoIterator<Item = &'a Row<T>>,
    path: &Path,
) -> Result<usize, ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    let count = write_csv(rows, &mut out)?;
    out.flush().map_err(io_err)?;
    info!(rows = count, path = %path.display(), "exported csv");
    Ok(count)
}
