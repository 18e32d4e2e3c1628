use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::entities::admin::{
    AdminEntity, Application, CommissionRate, Deal, Developer, InventoryItem, Launch, Project,
    UserProfile,
};
use crate::domain::entities::form::{apply_action, apply_form, Editable, FieldKind};
use crate::domain::entities::listing::{FieldConstraint, SortDirection};
use crate::domain::entities::record::{Reconcilable, Record, Row, RowKey};
use crate::infra::sqlite::repo::{
    InventoryCompounds, InventoryDevelopers, LiveCommissionSheet, SqliteRepo,
};
use crate::infra::sqlite::tables::SqlWritable;
use crate::platform::desktop::blocking::run_blocking;
use crate::usecase::export::{cell_text, export_csv_to_path, row_fields};
use crate::usecase::list_view::{ExportPlan, ListMode, ListView, LoadState, RowInteraction};
use crate::usecase::ports::repo::{DerivedSource, ReferenceSource, RowSource};
use crate::usecase::reconcile::ReconciledSource;
use crate::usecase::services::edit_service::{EditError, EditService};
use crate::usecase::services::query_service::QueryService;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub key: RowKey,
    pub cells: Vec<String>,
    pub selected: bool,
    pub read_only: bool,
}

/// Everything the table needs to render one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
    pub state: LoadState,
    pub empty_message: &'static str,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub page_window: Vec<usize>,
    pub has_previous: bool,
    pub has_next: bool,
    pub range_label: String,
    pub page_selected: bool,
    pub selected_count: usize,
    pub can_create: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormInput {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    /// `(value, label)` pairs for choice and reference fields.
    pub options: Vec<(String, String)>,
}

/// A create or edit form; `row` is `None` for a new row.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub row: Option<RowKey>,
    pub inputs: Vec<FormInput>,
}

/// Type-erased list view so the shell can switch entities at run time.
pub trait TableController {
    fn entity(&self) -> AdminEntity;
    fn refresh(&mut self);
    fn set_query(&mut self, query: &str);
    fn set_constraint(&mut self, field: &str, constraint: Option<FieldConstraint>);
    fn set_page(&mut self, page: usize);
    fn set_page_size(&mut self, page_size: usize);
    fn sort_by(&mut self, column: &str);
    fn interact(&mut self, interaction: RowInteraction) -> Option<RowKey>;
    fn toggle_page(&mut self, selected: bool);
    fn snapshot(&self) -> TableSnapshot;
    fn details(&self, key: &RowKey) -> Option<Vec<(String, String)>>;
    fn export_csv(&self, path: &Path) -> Result<usize>;
    fn edit_form(&self, key: Option<&RowKey>) -> Result<EditForm, EditError>;
    fn save_form(
        &mut self,
        key: Option<&RowKey>,
        values: &[(String, String)],
    ) -> Result<(), EditError>;
    /// Labels of the quick actions that would change this row.
    fn row_actions(&self, key: &RowKey) -> Vec<&'static str>;
    fn run_action(&mut self, key: &RowKey, label: &str) -> Result<(), EditError>;
    fn delete_row(&mut self, key: &RowKey) -> Result<(), EditError>;
    fn delete_selected(&mut self) -> Result<usize, EditError>;
}

pub struct EntityController<T: Record> {
    entity: AdminEntity,
    view: ListView<T>,
    query: QueryService<T>,
    edit: EditService<T>,
    references: Arc<dyn ReferenceSource>,
}

impl<T: Editable> EntityController<T> {
    pub fn new(
        entity: AdminEntity,
        mode: ListMode,
        page_size: usize,
        query: QueryService<T>,
        edit: EditService<T>,
        references: Arc<dyn ReferenceSource>,
    ) -> Self {
        Self {
            entity,
            view: ListView::new(mode, page_size),
            query,
            edit,
            references,
        }
    }

    /// The loaded database row behind `key`.
    fn writable_row(&self, key: &RowKey) -> Result<Row<T>, EditError> {
        if let RowKey::Derived(_) = key {
            return Err(EditError::ReadOnlyRow);
        }
        self.view.find_row(key).cloned().ok_or(EditError::NotListed)
    }

    fn options_for(&self, kind: FieldKind) -> Result<Vec<(String, String)>, EditError> {
        let pairs = match kind {
            FieldKind::Choice(choices) => {
                return Ok(choices
                    .iter()
                    .map(|choice| (choice.to_string(), choice.to_string()))
                    .collect())
            }
            FieldKind::Developer => run_blocking(|| self.references.developer_options())?,
            FieldKind::Project => run_blocking(|| self.references.project_options())?,
            _ => return Ok(Vec::new()),
        };
        Ok(pairs
            .into_iter()
            .map(|(id, name)| (id.to_string(), name))
            .collect())
    }
}

impl<T: Editable> TableController for EntityController<T> {
    fn entity(&self) -> AdminEntity {
        self.entity
    }

    fn refresh(&mut self) {
        let (ticket, plan) = self.view.begin_load();
        let result = run_blocking(|| self.query.load(&plan));
        if let Err(err) = &result {
            tracing::error!(entity = self.entity.slug(), error = %err, "load failed");
        }
        self.view.finish_load(ticket, result);
    }

    fn set_query(&mut self, query: &str) {
        self.view.set_query(query);
        self.view.clear_selection();
        if self.view.mode() == ListMode::Paged {
            self.refresh();
        }
    }

    fn set_constraint(&mut self, field: &str, constraint: Option<FieldConstraint>) {
        self.view.set_constraint(field, constraint);
        self.view.clear_selection();
        if self.view.mode() == ListMode::Paged {
            self.refresh();
        }
    }

    fn set_page(&mut self, page: usize) {
        self.view.set_page(page);
        if self.view.mode() == ListMode::Paged {
            self.refresh();
        }
    }

    fn set_page_size(&mut self, page_size: usize) {
        self.view.set_page_size(page_size);
        if self.view.mode() == ListMode::Paged {
            self.refresh();
        }
    }

    fn sort_by(&mut self, column: &str) {
        if self.view.sort_by(column) && self.view.mode() == ListMode::Paged {
            self.refresh();
        }
    }

    fn interact(&mut self, interaction: RowInteraction) -> Option<RowKey> {
        self.view.interact(interaction)
    }

    fn toggle_page(&mut self, selected: bool) {
        self.view.toggle_page(selected);
    }

    fn snapshot(&self) -> TableSnapshot {
        let sort = self.view.sort();
        let columns = T::columns()
            .iter()
            .map(|column| ColumnView {
                key: column.key,
                label: column.label,
                sortable: column.sortable,
                sort: sort.direction_for(column.key),
            })
            .collect();
        let rows = self
            .view
            .visible_rows()
            .into_iter()
            .map(|row| {
                let key = row.key();
                RowView {
                    selected: self.view.selection().contains(&key),
                    read_only: row.database_id().is_none(),
                    cells: T::columns()
                        .iter()
                        .map(|column| row.record.field(column.key).to_string())
                        .collect(),
                    key,
                }
            })
            .collect();
        let pagination = self.view.pagination();

        TableSnapshot {
            columns,
            rows,
            state: self.view.state().clone(),
            empty_message: self.entity.empty_message(),
            page: pagination.page(),
            page_size: pagination.page_size(),
            total_pages: pagination.total_pages(),
            page_window: pagination.page_window(),
            has_previous: pagination.has_previous(),
            has_next: pagination.has_next(),
            range_label: pagination.range_label(),
            page_selected: self.view.page_fully_selected(),
            selected_count: self.view.selection().len(),
            can_create: T::CREATABLE,
        }
    }

    fn details(&self, key: &RowKey) -> Option<Vec<(String, String)>> {
        let row = self.view.find_row(key)?;
        let fields = row_fields(row).ok()?;
        Some(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), cell_text(Some(value))))
                .collect(),
        )
    }

    fn export_csv(&self, path: &Path) -> Result<usize> {
        let count = match self.view.export_plan() {
            ExportPlan::Local(rows) => export_csv_to_path(rows, path)?,
            ExportPlan::Remote(query) => {
                let rows = run_blocking(|| self.query.export_rows(&query))?;
                export_csv_to_path(&rows, path)?
            }
        };
        Ok(count)
    }

    fn edit_form(&self, key: Option<&RowKey>) -> Result<EditForm, EditError> {
        let record = match key {
            Some(key) => self.writable_row(key)?.record,
            None if T::CREATABLE => T::default(),
            None => return Err(EditError::NotCreatable),
        };
        let inputs = T::form_fields()
            .iter()
            .map(|field| {
                Ok(FormInput {
                    key: field.key,
                    label: field.label,
                    kind: field.kind,
                    required: field.required,
                    value: record.form_value(field.key),
                    options: self.options_for(field.kind)?,
                })
            })
            .collect::<Result<Vec<_>, EditError>>()?;
        Ok(EditForm {
            row: key.cloned(),
            inputs,
        })
    }

    fn save_form(
        &mut self,
        key: Option<&RowKey>,
        values: &[(String, String)],
    ) -> Result<(), EditError> {
        match key {
            Some(key) => {
                let row = self.writable_row(key)?;
                let mut record = row.record.clone();
                apply_form(&mut record, values)?;
                self.edit.update(&row, &record)?;
            }
            None if T::CREATABLE => {
                let mut record = T::default();
                apply_form(&mut record, values)?;
                self.edit.create(&record)?;
            }
            None => return Err(EditError::NotCreatable),
        }
        self.refresh();
        Ok(())
    }

    fn row_actions(&self, key: &RowKey) -> Vec<&'static str> {
        let Ok(row) = self.writable_row(key) else {
            return Vec::new();
        };
        T::quick_actions()
            .iter()
            .filter(|action| row.record.form_value(action.field) != action.value)
            .map(|action| action.label)
            .collect()
    }

    fn run_action(&mut self, key: &RowKey, label: &str) -> Result<(), EditError> {
        let action = T::quick_actions()
            .iter()
            .find(|action| action.label == label)
            .ok_or_else(|| EditError::UnknownAction(label.to_string()))?;
        let row = self.writable_row(key)?;
        let mut record = row.record.clone();
        apply_action(&mut record, action)?;
        self.edit.update(&row, &record)?;
        info!(entity = self.entity.slug(), row = %key, action = label, "row action");
        self.refresh();
        Ok(())
    }

    fn delete_row(&mut self, key: &RowKey) -> Result<(), EditError> {
        let row = self
            .view
            .find_row(key)
            .cloned()
            .ok_or(EditError::NotListed)?;
        self.edit.delete(&row)?;
        self.view.toggle_row(key.clone(), false);
        self.refresh();
        Ok(())
    }

    /// Works from the selected keys alone, so rows picked on other pages
    /// are deleted too. The selection is kept when the delete fails.
    fn delete_selected(&mut self) -> Result<usize, EditError> {
        let keys: Vec<RowKey> = self.view.selection().iter().cloned().collect();
        let result = self.edit.delete_keys(&keys);
        match &result {
            Ok(deleted) => {
                self.view.clear_selection();
                info!(entity = self.entity.slug(), deleted, "bulk delete");
            }
            Err(err) => {
                tracing::warn!(entity = self.entity.slug(), error = %err, "bulk delete failed")
            }
        }
        self.refresh();
        result
    }
}

fn reconciled<T>(
    repo: &Arc<SqliteRepo>,
    derived: Arc<dyn DerivedSource<T::Derived>>,
) -> Arc<dyn RowSource<T>>
where
    T: Reconcilable + SqlWritable + Send + Sync,
{
    Arc::new(ReconciledSource::new(repo.clone(), derived))
}

fn controller<T>(
    entity: AdminEntity,
    mode: ListMode,
    config: &AppConfig,
    repo: &Arc<SqliteRepo>,
    source: Arc<dyn RowSource<T>>,
) -> Box<dyn TableController>
where
    T: SqlWritable + Editable,
{
    Box::new(EntityController::new(
        entity,
        mode,
        config.page_size,
        QueryService::new(source),
        EditService::new(repo.clone()),
        repo.clone(),
    ))
}

/// Wires one entity's sources and services.
pub fn build_controller(
    entity: AdminEntity,
    config: &AppConfig,
    repo: &Arc<SqliteRepo>,
) -> Box<dyn TableController> {
    let db_path: PathBuf = repo.db_path().to_path_buf();
    match entity {
        AdminEntity::Developers => {
            let source = reconciled::<Developer>(
                repo,
                Arc::new(InventoryDevelopers { db_path }),
            );
            controller(entity, ListMode::Complete, config, repo, source)
        }
        AdminEntity::Projects => {
            let source = reconciled::<Project>(repo, Arc::new(InventoryCompounds { db_path }));
            controller(entity, ListMode::Complete, config, repo, source)
        }
        AdminEntity::Commissions => {
            let source = reconciled::<CommissionRate>(
                repo,
                Arc::new(LiveCommissionSheet {
                    path: config.live_commissions_path.clone(),
                }),
            );
            controller(entity, ListMode::Complete, config, repo, source)
        }
        AdminEntity::Applications => {
            controller::<Application>(entity, ListMode::Paged, config, repo, repo.clone())
        }
        AdminEntity::Deals => {
            controller::<Deal>(entity, ListMode::Paged, config, repo, repo.clone())
        }
        AdminEntity::Inventory => {
            controller::<InventoryItem>(entity, ListMode::Paged, config, repo, repo.clone())
        }
        AdminEntity::Launches => {
            controller::<Launch>(entity, ListMode::Paged, config, repo, repo.clone())
        }
        AdminEntity::Users => {
            controller::<UserProfile>(entity, ListMode::Paged, config, repo, repo.clone())
        }
    }
}
