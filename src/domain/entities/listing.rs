use chrono::NaiveDate;

use crate::domain::entities::record::{FieldValue, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Sort on one column. Text compares case-insensitively first, then by its
/// raw bytes so `"ANN" < "Ann" < "ann"`. Nulls come first ascending and last
/// descending. Rows that are still equal keep their source order locally and
/// fall back to ascending id in SQL. SQLite folds only ASCII case, so
/// non-ASCII text with mixed case can order differently between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Column-header sort state. `None` keeps the source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    current: Option<SortSpec>,
}

impl SortState {
    pub fn current(&self) -> Option<&SortSpec> {
        self.current.as_ref()
    }

    /// Same column flips the direction, a new column starts ascending.
    pub fn toggle(&mut self, column: &str) {
        self.current = Some(match self.current.take() {
            Some(spec) if spec.column == column => SortSpec {
                column: spec.column,
                direction: spec.direction.flipped(),
            },
            _ => SortSpec {
                column: column.to_string(),
                direction: SortDirection::Asc,
            },
        });
    }

    pub fn direction_for(&self, column: &str) -> Option<SortDirection> {
        self.current
            .as_ref()
            .filter(|spec| spec.column == column)
            .map(|spec| spec.direction)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldConstraint {
    Equals {
        field: String,
        value: FieldValue,
    },
    /// Inclusive on both ends; a missing bound is open.
    DateRange {
        field: String,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    /// Case-insensitive substring of the field's text.
    Contains { field: String, needle: String },
    /// Inclusive on both ends; a missing bound is open.
    NumberRange {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl FieldConstraint {
    pub fn equals(field: &str, value: FieldValue) -> Self {
        FieldConstraint::Equals {
            field: field.to_string(),
            value,
        }
    }

    pub fn date_range(field: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        FieldConstraint::DateRange {
            field: field.to_string(),
            from,
            to,
        }
    }

    pub fn contains(field: &str, needle: &str) -> Self {
        FieldConstraint::Contains {
            field: field.to_string(),
            needle: needle.to_string(),
        }
    }

    pub fn number_range(field: &str, min: Option<f64>, max: Option<f64>) -> Self {
        FieldConstraint::NumberRange {
            field: field.to_string(),
            min,
            max,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            FieldConstraint::Equals { field, .. }
            | FieldConstraint::DateRange { field, .. }
            | FieldConstraint::Contains { field, .. }
            | FieldConstraint::NumberRange { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub query: String,
    pub constraints: Vec<FieldConstraint>,
}

impl FilterState {
    pub fn with_query(query: &str) -> Self {
        Self {
            query: query.to_string(),
            constraints: Vec::new(),
        }
    }

    /// Replaces any constraint on the same field; `None` clears it.
    pub fn set_constraint(&mut self, field: &str, constraint: Option<FieldConstraint>) {
        self.constraints.retain(|c| c.field() != field);
        if let Some(constraint) = constraint {
            self.constraints.push(constraint);
        }
    }

    /// The query as typed, or `None` when it is blank. Surrounding spaces
    /// are part of the term.
    pub fn search_term(&self) -> Option<&str> {
        (!self.query.trim().is_empty()).then_some(self.query.as_str())
    }
}

/// Parameters of a server-side listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub page: usize,
    pub page_size: usize,
    pub filter: FilterState,
    pub sort: Option<SortSpec>,
}

impl PageQuery {
    pub fn first_page(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            filter: FilterState::default(),
            sort: None,
        }
    }

    /// Every filtered row in one page; used for exports.
    pub fn unpaginated(filter: FilterState, sort: Option<SortSpec>) -> Self {
        Self {
            page: 1,
            page_size: usize::MAX,
            filter,
            sort,
        }
    }

    pub fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub rows: Vec<Row<T>>,
    pub total: usize,
}
