use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::domain::entities::admin::LiveCommission;
use crate::domain::entities::listing::{PageQuery, PageResult};
use crate::domain::entities::record::{RecordId, Row};
use crate::infra::import::commissions::read_live_commissions;
use crate::infra::sqlite::queries::{
    delete_record, developer_options, distinct_inventory_compounds,
    distinct_inventory_developers, insert_record, list_all, project_options, query_rows,
    update_record,
};
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::infra::sqlite::tables::{SqlTable, SqlWritable};
use crate::usecase::ports::repo::{
    DerivedSource, RecordStore, ReferenceSource, RepoError, RowSource,
};

pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl SqliteRepo {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    pub fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(RepoError::from_anyhow)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Rejects fields the table cannot filter or sort on before any SQL runs.
fn check_fields<T: SqlTable>(query: &PageQuery) -> Result<(), RepoError> {
    let constraint_fields = query.filter.constraints.iter().map(|c| c.field());
    let sort_field = query.sort.iter().map(|spec| spec.column.as_str());
    for field in constraint_fields.chain(sort_field) {
        if T::sql_field(field).is_none() {
            return Err(RepoError::UnknownField(field.to_string()));
        }
    }
    Ok(())
}

impl<T: SqlTable> RowSource<T> for SqliteRepo {
    fn list_rows(&self, query: &PageQuery) -> Result<PageResult<T>, RepoError> {
        check_fields::<T>(query)?;
        let conn = open_connection(&self.db_path).map_err(RepoError::from_anyhow)?;
        let (rows, total) = query_rows::<T>(&conn, query).map_err(RepoError::from_anyhow)?;
        Ok(PageResult { rows, total })
    }

    fn list_all(&self) -> Result<Vec<Row<T>>, RepoError> {
        let conn = open_connection(&self.db_path).map_err(RepoError::from_anyhow)?;
        list_all::<T>(&conn).map_err(RepoError::from_anyhow)
    }
}

impl<T: SqlWritable> RecordStore<T> for SqliteRepo {
    fn create(&self, record: &T) -> Result<RecordId, RepoError> {
        let conn = open_connection(&self.db_path).map_err(RepoError::from_anyhow)?;
        insert_record(&conn, record)
            .map(RecordId)
            .map_err(RepoError::from_anyhow)
    }

    fn update(&self, id: RecordId, record: &T) -> Result<(), RepoError> {
        let conn = open_connection(&self.db_path).map_err(RepoError::from_anyhow)?;
        match update_record(&conn, id.0, record).map_err(RepoError::from_anyhow)? {
            0 => Err(RepoError::NotFound(id)),
            _ => Ok(()),
        }
    }

    fn delete(&self, id: RecordId) -> Result<(), RepoError> {
        let conn = open_connection(&self.db_path).map_err(RepoError::from_anyhow)?;
        match delete_record::<T>(&conn, id.0).map_err(RepoError::from_anyhow)? {
            0 => Err(RepoError::NotFound(id)),
            _ => Ok(()),
        }
    }
}

fn with_ids(options: Vec<(i64, String)>) -> Vec<(RecordId, String)> {
    options
        .into_iter()
        .map(|(id, name)| (RecordId(id), name))
        .collect()
}

impl ReferenceSource for SqliteRepo {
    fn developer_options(&self) -> Result<Vec<(RecordId, String)>, RepoError> {
        let conn = open_connection(&self.db_path).map_err(RepoError::from_anyhow)?;
        developer_options(&conn)
            .map(with_ids)
            .map_err(RepoError::from_anyhow)
    }

    fn project_options(&self) -> Result<Vec<(RecordId, String)>, RepoError> {
        let conn = open_connection(&self.db_path).map_err(RepoError::from_anyhow)?;
        project_options(&conn)
            .map(with_ids)
            .map_err(RepoError::from_anyhow)
    }
}

/// Developer names found on inventory properties.
pub struct InventoryDevelopers {
    pub db_path: PathBuf,
}

impl DerivedSource<Option<String>> for InventoryDevelopers {
    fn list_derived(&self) -> Result<Vec<Option<String>>, RepoError> {
        let conn = open_connection(&self.db_path).map_err(RepoError::from_anyhow)?;
        distinct_inventory_developers(&conn).map_err(RepoError::from_anyhow)
    }
}

/// Compound names found on inventory properties.
pub struct InventoryCompounds {
    pub db_path: PathBuf,
}

impl DerivedSource<Option<String>> for InventoryCompounds {
    fn list_derived(&self) -> Result<Vec<Option<String>>, RepoError> {
        let conn = open_connection(&self.db_path).map_err(RepoError::from_anyhow)?;
        distinct_inventory_compounds(&conn).map_err(RepoError::from_anyhow)
    }
}

/// The live commission sheet. No configured path means an empty sheet.
pub struct LiveCommissionSheet {
    pub path: Option<PathBuf>,
}

impl DerivedSource<LiveCommission> for LiveCommissionSheet {
    fn list_derived(&self) -> Result<Vec<LiveCommission>, RepoError> {
        let Some(path) = &self.path else {
            debug!("no live commission sheet configured");
            return Ok(Vec::new());
        };
        read_live_commissions(path)
            .with_context(|| format!("failed to load live commissions: {}", path.display()))
            .map_err(RepoError::from_anyhow)
    }
}
