use crate::domain::entities::listing::{FieldConstraint, FilterState, SortDirection, SortSpec};
use crate::domain::entities::record::{FieldValue, Record, Row};

/// A blank query matches everything; otherwise the query, spaces included,
/// must be a case-insensitive substring of some search field.
pub fn matches_query<T: Record>(record: &T, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_constraint<T: Record>(record: &T, constraint: &FieldConstraint) -> bool {
    match constraint {
        FieldConstraint::Equals { field, value } => record.field(field) == *value,
        FieldConstraint::DateRange { field, from, to } => {
            let Some(day) = record.field(field).as_date() else {
                return false;
            };
            from.map_or(true, |from| day >= from) && to.map_or(true, |to| day <= to)
        }
        FieldConstraint::Contains { field, needle } => match record.field(field) {
            FieldValue::Null => false,
            value => value
                .to_string()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        },
        FieldConstraint::NumberRange { field, min, max } => {
            let FieldValue::Number(number) = record.field(field) else {
                return false;
            };
            min.map_or(true, |min| number >= min) && max.map_or(true, |max| number <= max)
        }
    }
}

pub fn matches<T: Record>(record: &T, filter: &FilterState) -> bool {
    matches_query(record, &filter.query)
        && filter
            .constraints
            .iter()
            .all(|constraint| matches_constraint(record, constraint))
}

/// Stable filter: keeps the input order.
pub fn apply_filter<'a, T: Record>(rows: &'a [Row<T>], filter: &FilterState) -> Vec<&'a Row<T>> {
    rows.iter().filter(|row| matches(&row.record, filter)).collect()
}

/// Stable sort on one column; equal values keep their filtered order.
pub fn sort_rows<T: Record>(rows: &mut [&Row<T>], sort: &SortSpec) {
    rows.sort_by(|a, b| {
        let ordering = a
            .record
            .field(&sort.column)
            .sort_cmp(&b.record.field(&sort.column));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
