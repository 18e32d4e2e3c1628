use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::entities::record::{
    Record, RecordId, Row, RowKey, RowOrigin, ValidationError,
};
use crate::usecase::ports::repo::{RecordStore, RepoError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("rows inferred from another dataset are read-only")]
    ReadOnlyRow,
    #[error("row is no longer listed")]
    NotListed,
    #[error("new rows cannot be added to this table")]
    NotCreatable,
    #[error("{0:?} is not available for this row")]
    UnknownAction(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct EditService<T: Record> {
    store: Arc<dyn RecordStore<T>>,
}

impl<T: Record> EditService<T> {
    pub fn new(store: Arc<dyn RecordStore<T>>) -> Self {
        Self { store }
    }

    pub fn create(&self, record: &T) -> Result<RecordId, EditError> {
        record.validate()?;
        let id = self.store.create(record)?;
        info!(%id, "created record");
        Ok(id)
    }

    pub fn update(&self, row: &Row<T>, record: &T) -> Result<(), EditError> {
        let id = writable_id(row)?;
        record.validate()?;
        self.store.update(id, record)?;
        info!(%id, "updated record");
        Ok(())
    }

    pub fn delete(&self, row: &Row<T>) -> Result<(), EditError> {
        let id = writable_id(row)?;
        self.store.delete(id)?;
        info!(%id, "deleted record");
        Ok(())
    }

    /// Deletes every row named by `keys`, whether or not it is currently
    /// loaded. Fails before touching the store if any key is derived.
    pub fn delete_keys<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a RowKey>,
    ) -> Result<usize, EditError> {
        let ids = keys
            .into_iter()
            .map(|key| match key {
                RowKey::Id(id) => Ok(*id),
                RowKey::Derived(_) => Err(EditError::ReadOnlyRow),
            })
            .collect::<Result<Vec<_>, _>>()?;
        for id in &ids {
            self.store.delete(*id)?;
        }
        info!(count = ids.len(), "deleted records");
        Ok(ids.len())
    }
}

fn writable_id<T>(row: &Row<T>) -> Result<RecordId, EditError> {
    match row.origin {
        RowOrigin::Database(id) => Ok(id),
        RowOrigin::Derived => Err(EditError::ReadOnlyRow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::entities::admin::{CommissionRate, Developer};

    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
    }

    impl<T: Record> RecordStore<T> for RecordingStore {
        fn create(&self, _record: &T) -> Result<RecordId, RepoError> {
            self.calls.lock().unwrap().push("create".to_string());
            Ok(RecordId(1))
        }

        fn update(&self, id: RecordId, _record: &T) -> Result<(), RepoError> {
            self.calls.lock().unwrap().push(format!("update {id}"));
            Ok(())
        }

        fn delete(&self, id: RecordId) -> Result<(), RepoError> {
            self.calls.lock().unwrap().push(format!("delete {id}"));
            Ok(())
        }
    }

    fn developer(name: &str) -> Developer {
        Developer {
            name: name.to_string(),
            ..Developer::default()
        }
    }

    #[test]
    fn derived_rows_cannot_be_edited_or_deleted() {
        let store = Arc::new(RecordingStore::default());
        let service: EditService<Developer> = EditService::new(store.clone());
        let derived = Row::derived(developer("Inferred"));

        assert_eq!(
            service.update(&derived, &developer("Renamed")),
            Err(EditError::ReadOnlyRow)
        );
        assert_eq!(service.delete(&derived), Err(EditError::ReadOnlyRow));
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn database_rows_reach_the_store() {
        let store = Arc::new(RecordingStore::default());
        let service: EditService<Developer> = EditService::new(store.clone());
        let row = Row::database(5, developer("Acme"));

        service.update(&row, &developer("Acme Group")).unwrap();
        service.delete(&row).unwrap();

        assert_eq!(
            *store.calls.lock().unwrap(),
            vec!["update 5".to_string(), "delete 5".to_string()]
        );
    }

    #[test]
    fn bulk_delete_rejects_mixed_selection_up_front() {
        let store = Arc::new(RecordingStore::default());
        let service: EditService<Developer> = EditService::new(store.clone());
        let keys = vec![
            RowKey::Id(RecordId(1)),
            RowKey::Derived("inferred".to_string()),
        ];

        assert_eq!(service.delete_keys(&keys), Err(EditError::ReadOnlyRow));
        assert!(store.calls.lock().unwrap().is_empty());
        assert_eq!(service.delete_keys(&keys[..1]), Ok(1));
    }

    #[test]
    fn bulk_delete_needs_only_the_ids() {
        let store = Arc::new(RecordingStore::default());
        let service: EditService<Developer> = EditService::new(store.clone());
        // None of these rows has to be loaded for the delete to reach them.
        let keys = vec![RowKey::Id(RecordId(21)), RowKey::Id(RecordId(40))];

        assert_eq!(service.delete_keys(&keys), Ok(2));
        assert_eq!(
            *store.calls.lock().unwrap(),
            vec!["delete 21".to_string(), "delete 40".to_string()]
        );
    }

    #[test]
    fn invalid_commission_is_rejected_before_store() {
        let store = Arc::new(RecordingStore::default());
        let service: EditService<CommissionRate> = EditService::new(store.clone());
        let rate = CommissionRate {
            developer_id: Some(RecordId(1)),
            developer_name: "Emaar".to_string(),
            percentage: 25.0,
            ..CommissionRate::default()
        };

        assert_eq!(
            service.create(&rate),
            Err(EditError::Invalid(ValidationError::PercentageOutOfRange(25.0)))
        );
        assert!(store.calls.lock().unwrap().is_empty());
    }
}
