use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::domain::entities::admin::LiveCommission;

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.trim().to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

fn cell_to_percent(cell: &Data) -> f64 {
    match cell {
        Data::Float(v) => *v,
        Data::Int(v) => *v as f64,
        Data::String(v) => v.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Lowercased header with spaces, underscores and symbols removed, so
/// `Developer Name`, `developer_name` and `developerName` all match.
fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase()
}

#[derive(Debug, Default)]
struct SheetColumns {
    developer: Option<usize>,
    percent: Option<usize>,
    projects: Option<usize>,
}

impl SheetColumns {
    fn from_header(header: &[Data]) -> Self {
        let mut columns = SheetColumns::default();
        for (idx, cell) in header.iter().enumerate() {
            match header_key(&cell_to_string(cell)).as_str() {
                "developername" | "developer" => columns.developer = Some(idx),
                "commissionpercent" | "commission" | "percentage" => {
                    columns.percent = Some(idx)
                }
                "projects" | "project" => columns.projects = Some(idx),
                _ => {}
            }
        }
        columns
    }
}

/// Reads the first sheet of a commission workbook. The first row holds the
/// headers; rows without a developer name are kept and left for the
/// reconciler to drop.
pub fn read_commission_workbook(xlsx_path: &Path) -> Result<Vec<LiveCommission>> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open xlsx: {}", xlsx_path.display()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("workbook has no sheets: {}", xlsx_path.display()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = SheetColumns::from_header(header);
    if columns.developer.is_none() {
        anyhow::bail!("sheet {sheet_name} has no developer column")
    }

    let text_at = |row: &[Data], idx: Option<usize>| {
        idx.and_then(|idx| row.get(idx))
            .map(cell_to_string)
            .filter(|value| !value.is_empty())
    };

    Ok(rows
        .map(|row| LiveCommission {
            developer_name: text_at(row, columns.developer),
            commission_percent: columns
                .percent
                .and_then(|idx| row.get(idx))
                .map(cell_to_percent)
                .unwrap_or(0.0),
            projects: text_at(row, columns.projects),
        })
        .collect())
}
