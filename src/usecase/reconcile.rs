use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::listing::{PageQuery, PageResult};
use crate::domain::entities::record::{fold_key, Reconcilable, Row};
use crate::usecase::filter::{apply_filter, sort_rows};
use crate::usecase::ports::repo::{DerivedSource, RepoError, RowSource};

/// Merges authoritative rows with rows inferred from a secondary dataset.
///
/// Database rows come first and win every key collision; derived rows
/// follow in encounter order. Keys compare case-insensitively and the first
/// occurrence wins. A failing derived source degrades to database rows only.
pub fn reconcile<T: Reconcilable>(
    database: Result<Vec<Row<T>>, RepoError>,
    derived: Result<Vec<T::Derived>, RepoError>,
) -> Result<Vec<Row<T>>, RepoError> {
    let database = database?;
    let mut seen = HashSet::with_capacity(database.len());
    let mut merged = Vec::with_capacity(database.len());

    for row in database {
        let key = fold_key(row.record.natural_key());
        if seen.insert(key) {
            merged.push(row);
        } else {
            debug!(key = row.record.natural_key(), "dropping duplicate database row");
        }
    }

    let candidates = match derived {
        Ok(candidates) => candidates,
        Err(err) => {
            warn!(error = %err, "derived source unavailable, using database rows only");
            return Ok(merged);
        }
    };

    let database_count = merged.len();
    for candidate in candidates {
        let Some(key) = T::derived_key(&candidate)
            .map(fold_key)
            .filter(|key| !key.is_empty())
        else {
            continue;
        };
        if seen.insert(key) {
            merged.push(Row::derived(T::from_derived(candidate)));
        }
    }

    debug!(
        database = database_count,
        derived = merged.len() - database_count,
        "reconciled row sources"
    );
    Ok(merged)
}

/// Row source that lists database rows merged with a derived dataset.
/// Paging over it happens in memory after reconciliation.
pub struct ReconciledSource<T: Reconcilable> {
    database: Arc<dyn RowSource<T>>,
    derived: Arc<dyn DerivedSource<T::Derived>>,
}

impl<T: Reconcilable> ReconciledSource<T> {
    pub fn new(
        database: Arc<dyn RowSource<T>>,
        derived: Arc<dyn DerivedSource<T::Derived>>,
    ) -> Self {
        Self { database, derived }
    }
}

impl<T> RowSource<T> for ReconciledSource<T>
where
    T: Reconcilable + Send + Sync,
{
    fn list_rows(&self, query: &PageQuery) -> Result<PageResult<T>, RepoError> {
        let rows = self.list_all()?;
        let mut filtered = apply_filter(&rows, &query.filter);
        if let Some(spec) = &query.sort {
            sort_rows(&mut filtered, spec);
        }
        let total = filtered.len();
        let rows = filtered
            .into_iter()
            .skip(query.offset())
            .take(query.page_size)
            .cloned()
            .collect();
        Ok(PageResult { rows, total })
    }

    fn list_all(&self) -> Result<Vec<Row<T>>, RepoError> {
        reconcile(self.database.list_all(), self.derived.list_derived())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::admin::{CommissionRate, Developer, LiveCommission};
    use crate::domain::entities::record::{Record, RecordId, RowOrigin};
    use proptest::prelude::*;

    fn db_dev(id: i64, name: &str) -> Row<Developer> {
        Row::database(
            id,
            Developer {
                name: name.to_string(),
                ..Developer::default()
            },
        )
    }

    fn names(rows: &[Row<Developer>]) -> Vec<(&str, &'static str)> {
        rows.iter()
            .map(|row| (row.record.name.as_str(), row.origin.label()))
            .collect()
    }

    #[test]
    fn merges_and_drops_blank_and_duplicate_keys() {
        let merged = reconcile(
            Ok(vec![db_dev(1, "Acme")]),
            Ok(vec![
                Some("Acme".to_string()),
                Some("Beta".to_string()),
                None,
                Some(String::new()),
            ]),
        )
        .expect("reconcile should succeed");

        assert_eq!(names(&merged), vec![("Acme", "database"), ("Beta", "derived")]);
    }

    #[test]
    fn key_comparison_ignores_case() {
        let merged = reconcile(
            Ok(vec![db_dev(1, "Palm Hills")]),
            Ok(vec![
                Some("PALM HILLS".to_string()),
                Some("sodic".to_string()),
                Some("SODIC".to_string()),
            ]),
        )
        .expect("reconcile should succeed");

        assert_eq!(names(&merged), vec![("Palm Hills", "database"), ("sodic", "derived")]);
    }

    #[test]
    fn derived_failure_keeps_database_rows() {
        let merged = reconcile::<Developer>(
            Ok(vec![db_dev(1, "Acme"), db_dev(2, "Zed")]),
            Err(RepoError::Message("inventory offline".to_string())),
        )
        .expect("derived failure must not fail the list");

        assert_eq!(names(&merged), vec![("Acme", "database"), ("Zed", "database")]);
    }

    #[test]
    fn database_failure_is_reported() {
        let result = reconcile::<Developer>(
            Err(RepoError::Message("db down".to_string())),
            Ok(vec![Some("Acme".to_string())]),
        );
        assert_eq!(result, Err(RepoError::Message("db down".to_string())));
    }

    #[test]
    fn commission_sheet_rows_fill_missing_developers() {
        let database = vec![Row::database(
            7,
            CommissionRate {
                developer_id: Some(RecordId(3)),
                developer_name: "Emaar".to_string(),
                percentage: 4.0,
                ..CommissionRate::default()
            },
        )];
        let sheet = vec![
            LiveCommission {
                developer_name: Some("emaar".to_string()),
                commission_percent: 9.0,
                projects: None,
            },
            LiveCommission {
                developer_name: Some("Ora".to_string()),
                commission_percent: 5.0,
                projects: Some("ZED".to_string()),
            },
        ];

        let merged = reconcile(Ok(database), Ok(sheet)).expect("reconcile should succeed");

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].origin, RowOrigin::Database(RecordId(7)));
        assert_eq!(merged[0].record.percentage, 4.0);
        assert_eq!(merged[1].origin, RowOrigin::Derived);
        assert_eq!(merged[1].record.natural_key(), "Ora");
    }

    struct FixedRows(Vec<Row<Developer>>);

    impl RowSource<Developer> for FixedRows {
        fn list_rows(&self, _query: &PageQuery) -> Result<PageResult<Developer>, RepoError> {
            unreachable!("reconciled listings only read every row")
        }

        fn list_all(&self) -> Result<Vec<Row<Developer>>, RepoError> {
            Ok(self.0.clone())
        }
    }

    struct FixedNames(Vec<Option<String>>);

    impl DerivedSource<Option<String>> for FixedNames {
        fn list_derived(&self) -> Result<Vec<Option<String>>, RepoError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn reconciled_source_pages_after_merging() {
        let source = ReconciledSource::new(
            Arc::new(FixedRows(vec![db_dev(1, "Acme"), db_dev(2, "Beta")])),
            Arc::new(FixedNames(vec![
                Some("Gamma".to_string()),
                Some("acme".to_string()),
                Some("Delta".to_string()),
            ])),
        );
        let mut query = PageQuery::first_page(2);
        query.page = 2;
        let page = source.list_rows(&query).expect("listing should succeed");
        assert_eq!(page.total, 4);
        assert_eq!(
            names(&page.rows),
            vec![("Gamma", "derived"), ("Delta", "derived")]
        );
    }

    proptest! {
        #[test]
        fn no_two_rows_share_a_key(
            db_names in proptest::collection::vec("[a-cA-C]{0,2}", 0..8),
            derived in proptest::collection::vec(proptest::option::of("[a-cA-C ]{0,3}"), 0..12),
        ) {
            let database: Vec<Row<Developer>> = db_names
                .iter()
                .enumerate()
                .map(|(idx, name)| db_dev(idx as i64, name))
                .collect();
            let merged = reconcile(Ok(database.clone()), Ok(derived.clone())).unwrap();

            let mut keys = HashSet::new();
            for row in &merged {
                prop_assert!(keys.insert(fold_key(row.record.natural_key())));
            }

            // every database key survives as a database row
            for row in &database {
                let key = fold_key(&row.record.name);
                let winner = merged
                    .iter()
                    .find(|r| fold_key(&r.record.name) == key)
                    .unwrap();
                prop_assert!(matches!(winner.origin, RowOrigin::Database(_)));
            }

            // database rows precede derived rows
            let first_derived = merged
                .iter()
                .position(|r| r.origin == RowOrigin::Derived)
                .unwrap_or(merged.len());
            prop_assert!(merged[first_derived..].iter().all(|r| r.origin == RowOrigin::Derived));
        }
    }
}
