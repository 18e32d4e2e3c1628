use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::entities::admin::LiveCommission;
use crate::infra::import::xlsx::read_commission_workbook;

/// Loads the live commission sheet from a JSON array or a spreadsheet,
/// chosen by file extension.
pub fn read_live_commissions(path: &Path) -> Result<Vec<LiveCommission>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let commissions = match extension.as_str() {
        "json" => {
            let file = File::open(path)
                .with_context(|| format!("failed to open json: {}", path.display()))?;
            serde_json::from_reader::<_, Vec<LiveCommission>>(BufReader::new(file))
                .with_context(|| format!("failed to parse json: {}", path.display()))?
        }
        "xlsx" | "xlsm" | "xls" | "ods" => read_commission_workbook(path)?,
        other => anyhow::bail!("unsupported commission sheet format: {other:?}"),
    };

    info!(entries = commissions.len(), path = %path.display(), "read live commissions");
    Ok(commissions)
}
