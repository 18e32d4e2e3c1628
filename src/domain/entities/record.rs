use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RecordId(pub i64);

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single cell value as seen by filtering, sorting and rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldValue {
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(v) => FieldValue::Text(v.to_string()),
            None => FieldValue::Null,
        }
    }

    pub fn opt_number(value: Option<f64>) -> Self {
        value.map(FieldValue::Number).unwrap_or(FieldValue::Null)
    }

    /// Dates are stored as `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`; only the
    /// calendar day participates in comparisons.
    pub fn opt_date(value: Option<&str>) -> Self {
        value
            .and_then(parse_day)
            .map(FieldValue::Date)
            .unwrap_or(FieldValue::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            FieldValue::Text(text) => parse_day(text),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Number(_) => 2,
            FieldValue::Date(_) => 3,
            FieldValue::Text(_) => 4,
        }
    }

    /// Total order used by column sorting. Nulls sort first; text compares
    /// case-insensitively with the raw text as tie-break.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Text(v) => write!(f, "{v}"),
            FieldValue::Number(v) => {
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{v}")
                }
            }
            FieldValue::Bool(v) => write!(f, "{}", if *v { "Yes" } else { "No" }),
            FieldValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

fn parse_day(text: &str) -> Option<NaiveDate> {
    let day = text.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

impl Column {
    pub const fn sortable(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: true,
        }
    }

    pub const fn plain(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("commission percentage must be between 0 and 20, got {0}")]
    PercentageOutOfRange(f64),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{0} must be a date (YYYY-MM-DD)")]
    NotADate(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("{value:?} is not an allowed {field}")]
    NotAllowed { field: &'static str, value: String },
}

pub trait Record: Clone + Serialize + 'static {
    fn columns() -> &'static [Column];

    /// Key used for de-duplication across row sources.
    fn natural_key(&self) -> &str;

    /// Display fields the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;

    fn field(&self, name: &str) -> FieldValue;

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn is_sortable(column: &str) -> bool {
        Self::columns()
            .iter()
            .any(|col| col.key == column && col.sortable)
    }
}

/// Records that can be synthesized from a secondary dataset.
pub trait Reconcilable: Record {
    type Derived: 'static;

    fn derived_key(candidate: &Self::Derived) -> Option<&str>;
    fn from_derived(candidate: Self::Derived) -> Self;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowOrigin {
    Database(RecordId),
    Derived,
}

impl RowOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            RowOrigin::Database(_) => "database",
            RowOrigin::Derived => "derived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowKey {
    Id(RecordId),
    Derived(String),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Id(id) => write!(f, "db:{id}"),
            RowKey::Derived(key) => write!(f, "derived:{key}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
    pub origin: RowOrigin,
    pub record: T,
}

impl<T: Record> Row<T> {
    pub fn database(id: i64, record: T) -> Self {
        Self {
            origin: RowOrigin::Database(RecordId(id)),
            record,
        }
    }

    pub fn derived(record: T) -> Self {
        Self {
            origin: RowOrigin::Derived,
            record,
        }
    }

    pub fn key(&self) -> RowKey {
        match self.origin {
            RowOrigin::Database(id) => RowKey::Id(id),
            RowOrigin::Derived => RowKey::Derived(fold_key(self.record.natural_key())),
        }
    }

    pub fn database_id(&self) -> Option<RecordId> {
        match self.origin {
            RowOrigin::Database(id) => Some(id),
            RowOrigin::Derived => None,
        }
    }
}

pub fn fold_key(key: &str) -> String {
    key.trim().to_lowercase()
}
