use tracing::debug;

use crate::domain::entities::listing::{
    FieldConstraint, FilterState, PageQuery, PageResult, SortState,
};
use crate::domain::entities::pagination::Pagination;
use crate::domain::entities::record::{Record, Row, RowKey};
use crate::domain::entities::selection::SelectionSet;
use crate::usecase::filter::{apply_filter, sort_rows};
use crate::usecase::ports::repo::RepoError;
use crate::usecase::request::{RequestSequencer, RequestTicket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

/// Rows held by a view: either the complete reconciled list, filtered and
/// paginated locally, or one server-side page plus the filtered total.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset<T> {
    Complete(Vec<Row<T>>),
    Paged { rows: Vec<Row<T>>, total: usize },
}

impl<T> Dataset<T> {
    fn empty_like(&self) -> Self {
        match self {
            Dataset::Complete(_) => Dataset::Complete(Vec::new()),
            Dataset::Paged { .. } => Dataset::Paged {
                rows: Vec::new(),
                total: 0,
            },
        }
    }
}

impl<T> From<PageResult<T>> for Dataset<T> {
    fn from(result: PageResult<T>) -> Self {
        Dataset::Paged {
            rows: result.rows,
            total: result.total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Load everything once per refresh; filter, sort and slice locally.
    Complete,
    /// Delegate filtering, sorting and slicing to the row source.
    Paged,
}

/// What a refresh has to fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPlan {
    All,
    Page(PageQuery),
}

/// Rows an export covers.
#[derive(Debug)]
pub enum ExportPlan<'a, T> {
    Local(Vec<&'a Row<T>>),
    Remote(PageQuery),
}

/// A click inside a table body. Checkbox clicks are reported separately
/// and never open the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowInteraction {
    Open(RowKey),
    Check { key: RowKey, selected: bool },
}

/// State behind one admin table: filter, sort, pagination, selection and the
/// `Idle -> Loading -> Loaded | Errored` lifecycle.
///
/// Order of operations is always filter, then sort, then paginate.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    mode: ListMode,
    filter: FilterState,
    sort: SortState,
    pagination: Pagination,
    selection: SelectionSet,
    dataset: Dataset<T>,
    state: LoadState,
    requests: RequestSequencer,
}

impl<T: Record> ListView<T> {
    pub fn new(mode: ListMode, page_size: usize) -> Self {
        let dataset = match mode {
            ListMode::Complete => Dataset::Complete(Vec::new()),
            ListMode::Paged => Dataset::Paged {
                rows: Vec::new(),
                total: 0,
            },
        };
        Self {
            mode,
            filter: FilterState::default(),
            sort: SortState::default(),
            pagination: Pagination::new(page_size),
            selection: SelectionSet::default(),
            dataset,
            state: LoadState::Idle,
            requests: RequestSequencer::default(),
        }
    }

    pub fn mode(&self) -> ListMode {
        self.mode
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Enters `Loading` and returns the ticket the response must carry.
    pub fn begin_load(&mut self) -> (RequestTicket, FetchPlan) {
        let ticket = self.requests.issue();
        self.state = LoadState::Loading;
        let plan = match self.mode {
            ListMode::Complete => FetchPlan::All,
            ListMode::Paged => FetchPlan::Page(self.page_query()),
        };
        debug!(sequence = ticket.sequence(), ?plan, "list load started");
        (ticket, plan)
    }

    /// Applies a fetch result. Responses for superseded tickets are
    /// discarded and `false` is returned.
    ///
    /// A failed fetch clears the rows so the empty message shows.
    pub fn finish_load(
        &mut self,
        ticket: RequestTicket,
        result: Result<Dataset<T>, RepoError>,
    ) -> bool {
        if !self.requests.is_current(ticket) {
            debug!(sequence = ticket.sequence(), "discarding superseded response");
            return false;
        }
        match result {
            Ok(dataset) => {
                self.dataset = dataset;
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                self.dataset = self.dataset.empty_like();
                self.state = LoadState::Errored(err.to_string());
            }
        }
        self.sync_total();
        true
    }

    pub fn set_query(&mut self, query: &str) {
        if self.filter.query == query {
            return;
        }
        self.filter.query = query.to_string();
        self.pagination.reset_page();
        self.sync_total();
    }

    pub fn set_constraint(&mut self, field: &str, constraint: Option<FieldConstraint>) {
        self.filter.set_constraint(field, constraint);
        self.pagination.reset_page();
        self.sync_total();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.set_page_size(page_size);
        self.sync_total();
    }

    pub fn set_page(&mut self, page: usize) {
        self.pagination.set_page(page);
    }

    /// Header click; ignored for columns that are not sortable.
    pub fn sort_by(&mut self, column: &str) -> bool {
        if !T::is_sortable(column) {
            return false;
        }
        self.sort.toggle(column);
        true
    }

    pub fn toggle_row(&mut self, key: RowKey, selected: bool) {
        self.selection.set(key, selected);
    }

    /// Header checkbox: selects or clears exactly the rows on this page.
    pub fn toggle_page(&mut self, selected: bool) {
        let keys: Vec<RowKey> = self.visible_rows().iter().map(|row| row.key()).collect();
        self.selection.set_all(&keys, selected);
    }

    pub fn page_fully_selected(&self) -> bool {
        let keys: Vec<RowKey> = self.visible_rows().iter().map(|row| row.key()).collect();
        self.selection.contains_all(&keys)
    }

    /// Returns the row to open, if the interaction was a row click.
    pub fn interact(&mut self, interaction: RowInteraction) -> Option<RowKey> {
        match interaction {
            RowInteraction::Open(key) => Some(key),
            RowInteraction::Check { key, selected } => {
                self.selection.set(key, selected);
                None
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Filtered and sorted, before pagination.
    pub fn filtered_rows(&self) -> Vec<&Row<T>> {
        match &self.dataset {
            Dataset::Complete(rows) => {
                let mut filtered = apply_filter(rows, &self.filter);
                if let Some(spec) = self.sort.current() {
                    sort_rows(&mut filtered, spec);
                }
                filtered
            }
            Dataset::Paged { rows, .. } => rows.iter().collect(),
        }
    }

    /// The current page slice.
    pub fn visible_rows(&self) -> Vec<&Row<T>> {
        match &self.dataset {
            Dataset::Complete(_) => {
                let filtered = self.filtered_rows();
                let (start, end) = self.pagination.slice_bounds();
                filtered
                    .get(start..end.min(filtered.len()))
                    .map(<[_]>::to_vec)
                    .unwrap_or_default()
            }
            Dataset::Paged { rows, .. } => rows.iter().collect(),
        }
    }

    /// Looks in the loaded rows only; in paged mode that is the current page.
    pub fn find_row(&self, key: &RowKey) -> Option<&Row<T>> {
        let rows = match &self.dataset {
            Dataset::Complete(rows) => rows,
            Dataset::Paged { rows, .. } => rows,
        };
        rows.iter().find(|row| row.key() == *key)
    }

    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.pagination.page(),
            page_size: self.pagination.page_size(),
            filter: self.filter.clone(),
            sort: self.sort.current().cloned(),
        }
    }

    /// Every filtered row regardless of the current page.
    pub fn export_plan(&self) -> ExportPlan<'_, T> {
        match self.mode {
            ListMode::Complete => ExportPlan::Local(self.filtered_rows()),
            ListMode::Paged => {
                ExportPlan::Remote(PageQuery::unpaginated(
                    self.filter.clone(),
                    self.sort.current().cloned(),
                ))
            }
        }
    }

    fn sync_total(&mut self) {
        let total = match &self.dataset {
            Dataset::Complete(rows) => rows
                .iter()
                .filter(|row| crate::usecase::filter::matches(&row.record, &self.filter))
                .count(),
            Dataset::Paged { total, .. } => *total,
        };
        self.pagination.set_total(total);
    }
}
