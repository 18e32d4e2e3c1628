use thiserror::Error;

use crate::domain::entities::listing::{PageQuery, PageResult};
use crate::domain::entities::record::{Record, RecordId, Row};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("{0}")]
    Message(String),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("record #{0} not found")]
    NotFound(RecordId),
}

impl RepoError {
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        RepoError::Message(format!("{err:#}"))
    }
}

/// Authoritative rows for one entity.
pub trait RowSource<T: Record>: Send + Sync {
    /// Server-side filtered, sorted and paginated listing.
    fn list_rows(&self, query: &PageQuery) -> Result<PageResult<T>, RepoError>;

    /// Every row, unpaginated, in the default order.
    fn list_all(&self) -> Result<Vec<Row<T>>, RepoError>;
}

/// Secondary dataset that rows can be inferred from.
pub trait DerivedSource<D>: Send + Sync {
    fn list_derived(&self) -> Result<Vec<D>, RepoError>;
}

pub trait RecordStore<T: Record>: Send + Sync {
    fn create(&self, record: &T) -> Result<RecordId, RepoError>;
    fn update(&self, id: RecordId, record: &T) -> Result<(), RepoError>;
    fn delete(&self, id: RecordId) -> Result<(), RepoError>;
}

/// Stored rows that other records point at, as `(id, name)` pairs.
pub trait ReferenceSource: Send + Sync {
    fn developer_options(&self) -> Result<Vec<(RecordId, String)>, RepoError>;
    fn project_options(&self) -> Result<Vec<(RecordId, String)>, RepoError>;
}
