use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::entities::admin::LiveCommission;
use crate::infra::import::commissions::read_live_commissions;
use crate::infra::import::csv::{import_properties_csv, ImportResult};

pub struct ImportService {
    db_path: PathBuf,
}

impl ImportService {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Loads an inventory export into the table the derived developer and
    /// compound lists are read from.
    pub fn import_inventory_csv(&self, path: &Path) -> Result<ImportResult> {
        import_properties_csv(&self.db_path, path)
    }

    /// Parses a commission sheet without storing it; used to validate a
    /// file before pointing the configuration at it.
    pub fn preview_live_commissions(&self, path: &Path) -> Result<Vec<LiveCommission>> {
        read_live_commissions(path)
    }
}
