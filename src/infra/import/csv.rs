use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;
use rusqlite::params;
use serde_json::Value;
use tracing::{info, warn};

use crate::infra::sqlite::schema::{init_db, open_connection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportResult {
    pub row_count: i64,
    pub skipped: i64,
}

/// Column positions of the inventory export, looked up by header name.
#[derive(Debug, Default)]
struct PropertyColumns {
    compound: Option<usize>,
    developer: Option<usize>,
    area: Option<usize>,
    property_type: Option<usize>,
    price: Option<usize>,
}

impl PropertyColumns {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = PropertyColumns::default();
        for (idx, header) in headers.iter().enumerate() {
            match header.trim().to_lowercase().as_str() {
                "compound" => columns.compound = Some(idx),
                "developer" => columns.developer = Some(idx),
                "area" => columns.area = Some(idx),
                "property_type" | "type" => columns.property_type = Some(idx),
                "price" | "price_in_egp" => columns.price = Some(idx),
                _ => {}
            }
        }
        columns
    }

    fn is_usable(&self) -> bool {
        self.compound.is_some() || self.developer.is_some()
    }
}

fn cell<'a>(record: &'a StringRecord, idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|idx| record.get(idx))
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("nan"))
}

/// Scraped exports store named entities either as plain text or as a
/// single-quoted object such as `{'id': 4, 'name': 'Sodic'}`.
pub fn entity_name(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if !raw.starts_with('{') {
        return Some(raw.to_string());
    }
    let normalized = raw.replace('\'', "\"").replace("None", "null");
    match serde_json::from_str::<Value>(&normalized) {
        Ok(Value::Object(object)) => object
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|value| value.replace(',', "").parse::<f64>().ok())
}

/// Appends the rows of an inventory CSV export to `properties`.
pub fn import_properties_csv(db_path: &Path, csv_path: &Path) -> Result<ImportResult> {
    init_db(db_path)?;

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
        .clone();

    let columns = PropertyColumns::from_headers(&headers);
    if !columns.is_usable() {
        anyhow::bail!("csv needs a compound or developer column")
    }

    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start transaction")?;

    let mut insert = tx
        .prepare(
            "INSERT INTO properties(compound, developer, area, property_type, price)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .context("failed to prepare property insert")?;

    let mut row_count = 0_i64;
    let mut skipped = 0_i64;
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(line = line + 2, error = %err, "skipping malformed csv record");
                skipped += 1;
                continue;
            }
        };
        insert
            .execute(params![
                entity_name(cell(&record, columns.compound)),
                entity_name(cell(&record, columns.developer)),
                entity_name(cell(&record, columns.area)),
                entity_name(cell(&record, columns.property_type)),
                parse_price(cell(&record, columns.price)),
            ])
            .context("failed to insert property")?;
        row_count += 1;
    }
    drop(insert);

    tx.commit().context("failed to commit import transaction")?;
    info!(rows = row_count, skipped, path = %csv_path.display(), "imported properties");

    Ok(ImportResult { row_count, skipped })
}
