use std::sync::Arc;

use tracing::info;

use crate::domain::entities::listing::PageQuery;
use crate::domain::entities::record::{Record, Row};
use crate::usecase::list_view::{Dataset, FetchPlan};
use crate::usecase::ports::repo::{RepoError, RowSource};

pub struct QueryService<T: Record> {
    source: Arc<dyn RowSource<T>>,
}

impl<T: Record> QueryService<T> {
    pub fn new(source: Arc<dyn RowSource<T>>) -> Self {
        Self { source }
    }

    pub fn load(&self, plan: &FetchPlan) -> Result<Dataset<T>, RepoError> {
        match plan {
            FetchPlan::All => {
                let rows = self.source.list_all()?;
                info!(rows = rows.len(), "loaded complete listing");
                Ok(Dataset::Complete(rows))
            }
            FetchPlan::Page(query) => {
                let page = self.source.list_rows(query)?;
                info!(
                    page = query.page,
                    rows = page.rows.len(),
                    total = page.total,
                    "loaded page"
                );
                Ok(page.into())
            }
        }
    }

    /// Every row matching the query, ignoring its page.
    pub fn export_rows(&self, query: &PageQuery) -> Result<Vec<Row<T>>, RepoError> {
        let unpaginated = PageQuery::unpaginated(query.filter.clone(), query.sort.clone());
        Ok(self.source.list_rows(&unpaginated)?.rows)
    }
}
