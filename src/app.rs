use std::sync::Arc;

use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::config::AppConfig;
use crate::domain::entities::admin::AdminEntity;
use crate::domain::entities::listing::FieldConstraint;
use crate::domain::entities::record::{FieldValue, RowKey};
use crate::infra::sqlite::repo::SqliteRepo;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::components::data_table::DataTable;
use crate::ui::components::edit_form::EditFormPanel;
use crate::ui::controller::{build_controller, EditForm, TableController};
use crate::ui::state::app_state::AppState;
use crate::ui::state::filter_inputs::{
    contains_input, date_filter_for, date_range_input, status_filter_for, value_range_input,
};
use crate::usecase::list_view::LoadState;
use crate::usecase::services::import_service::ImportService;

const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];
const ALL_STATUSES: &str = "all";
const FILTER_INPUT_STYLE: &str =
    "padding: 5px 8px; border: 1px solid #bbb; border-radius: 6px; width: 120px;";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DropdownId {
    Entity,
    PageSize,
    Status,
}

#[derive(Clone, Debug, PartialEq)]
struct DropdownOption {
    value: String,
    label: String,
}

fn dropdown_label(options: &[DropdownOption], selected: Option<&str>) -> String {
    selected
        .and_then(|value| options.iter().find(|opt| opt.value == value))
        .map(|opt| opt.label.clone())
        .unwrap_or_else(|| "(none)".to_string())
}

#[component]
fn DropdownSelect(
    id: DropdownId,
    label: &'static str,
    options: Vec<DropdownOption>,
    selected: Option<String>,
    mut open_dropdown: Signal<Option<DropdownId>>,
    mut dropdown_pos: Signal<Option<(f64, f64)>>,
    on_select: EventHandler<String>,
) -> Element {
    let is_open = open_dropdown() == Some(id);
    let selected_label = dropdown_label(&options, selected.as_deref());
    let (left, top) = dropdown_pos().unwrap_or((0.0, 0.0));

    rsx! {
        div {
            style: "position: relative; display: inline-flex; align-items: center; gap: 6px;",
            span { "{label}" }
            button {
                style: "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;",
                onclick: move |event| {
                    event.stop_propagation();
                    if open_dropdown() == Some(id) {
                        open_dropdown.set(None);
                        return;
                    }
                    let point = event.client_coordinates();
                    dropdown_pos.set(Some((point.x, point.y + 24.0)));
                    open_dropdown.set(Some(id));
                },
                "{selected_label}"
            }
        }

        if is_open {
            div {
                style: "position: fixed; left: {left}px; top: {top}px; min-width: 180px; max-height: 320px; overflow-y: auto; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200;",
                onclick: move |event| event.stop_propagation(),
                {options.iter().map(|opt| {
                    let value = opt.value.clone();
                    let label = opt.label.clone();
                    let is_selected = selected.as_deref() == Some(value.as_str());
                    let background = if is_selected { "#eef4ff" } else { "transparent" };
                    rsx!(
                        div {
                            style: "padding: 8px 10px; cursor: pointer; background: {background};",
                            onclick: move |_| {
                                on_select.call(value.clone());
                                open_dropdown.set(None);
                            },
                            "{label}"
                        }
                    )
                })}
            }
        }
    }
}

fn status_after_load(controller: &dyn TableController) -> String {
    match controller.snapshot().state {
        LoadState::Errored(err) => format!("Failed to load {}: {err}", controller.entity().label()),
        _ => format!("Loaded {}", controller.entity().label()),
    }
}

#[component]
pub fn App() -> Element {
    let initial_config = use_context::<AppConfig>();
    let repo = use_hook(|| Arc::new(SqliteRepo::new(initial_config.db_path.clone())));
    let import_service =
        use_hook(|| Arc::new(ImportService::new(initial_config.db_path.clone())));
    let mut config = use_signal(|| initial_config.clone());

    let AppState {
        mut entity,
        mut search,
        mut open_row,
        mut busy,
        mut status,
    } = AppState::new();

    let mut controller =
        use_signal(|| build_controller(AdminEntity::Developers, &initial_config, &repo));
    let mut status_filter = use_signal(|| ALL_STATUSES.to_string());
    let mut date_from = use_signal(String::new);
    let mut date_to = use_signal(String::new);
    let mut developer_filter = use_signal(String::new);
    let mut min_value = use_signal(String::new);
    let mut max_value = use_signal(String::new);
    let mut form = use_signal(|| None::<EditForm>);
    let mut form_error = use_signal(|| None::<String>);
    let mut open_dropdown = use_signal(|| None::<DropdownId>);
    let dropdown_pos = use_signal(|| None::<(f64, f64)>);

    let repo_for_init = repo.clone();
    use_effect(move || {
        *busy.write() = true;
        match run_blocking(|| repo_for_init.init()) {
            Ok(()) => {
                let mut table = controller.write();
                table.refresh();
                status.set(status_after_load(&**table));
            }
            Err(err) => status.set(format!("Failed to initialize database: {err}")),
        }
        *busy.write() = false;
    });

    let snapshot = controller.read().snapshot();
    let details = open_row().and_then(|key| {
        let table = controller.read();
        let actions = table.row_actions(&key);
        table.details(&key).map(|fields| (key, fields, actions))
    });
    let can_create = snapshot.can_create;
    let open_form = form();
    let form_row = open_form.as_ref().and_then(|open| open.row.clone());
    let form_key = form_row
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "new".to_string());
    let selected_count = snapshot.selected_count;
    let current_entity = entity();
    let page_size_value = snapshot.page_size.to_string();

    let entity_options = AdminEntity::ALL
        .iter()
        .map(|item| DropdownOption {
            value: item.slug().to_string(),
            label: item.label().to_string(),
        })
        .collect::<Vec<_>>();
    let page_size_options = PAGE_SIZE_OPTIONS
        .iter()
        .map(|size| DropdownOption {
            value: size.to_string(),
            label: format!("{size} / page"),
        })
        .collect::<Vec<_>>();
    let status_dropdown = status_filter_for(current_entity);
    let status_choices = status_dropdown
        .map(|(_, choices)| choices)
        .unwrap_or_default();
    let status_options = std::iter::once(ALL_STATUSES)
        .chain(status_choices.iter().copied())
        .map(|value| DropdownOption {
            value: value.to_string(),
            label: value.to_string(),
        })
        .collect::<Vec<_>>();
    let date_field = date_filter_for(current_entity);

    let repo_for_switch = repo.clone();
    let repo_for_sheet = repo.clone();
    let import_for_sheet = import_service.clone();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 12px; padding: 16px; height: 100vh; box-sizing: border-box; font-family: sans-serif;",
            onclick: move |_| open_dropdown.set(None),
            div {
                style: "display: flex; align-items: center; gap: 12px; flex-wrap: wrap;",
                DropdownSelect {
                    id: DropdownId::Entity,
                    label: "Table",
                    options: entity_options,
                    selected: Some(current_entity.slug().to_string()),
                    open_dropdown,
                    dropdown_pos,
                    on_select: move |slug: String| {
                        let Some(next) = AdminEntity::from_slug(&slug) else {
                            return;
                        };
                        *busy.write() = true;
                        entity.set(next);
                        search.set(String::new());
                        status_filter.set(ALL_STATUSES.to_string());
                        date_from.set(String::new());
                        date_to.set(String::new());
                        developer_filter.set(String::new());
                        min_value.set(String::new());
                        max_value.set(String::new());
                        open_row.set(None);
                        form.set(None);
                        let mut table = build_controller(next, &config.read(), &repo_for_switch);
                        table.refresh();
                        status.set(status_after_load(&*table));
                        controller.set(table);
                        *busy.write() = false;
                    },
                }
                input {
                    style: "padding: 5px 8px; border: 1px solid #bbb; border-radius: 6px; min-width: 240px;",
                    placeholder: "Search…",
                    value: "{search}",
                    oninput: move |event| {
                        let value = event.value();
                        search.set(value.clone());
                        open_row.set(None);
                        controller.write().set_query(&value);
                    },
                }
                DropdownSelect {
                    id: DropdownId::PageSize,
                    label: "Rows",
                    options: page_size_options,
                    selected: Some(page_size_value),
                    open_dropdown,
                    dropdown_pos,
                    on_select: move |value: String| {
                        if let Ok(size) = value.parse::<usize>() {
                            controller.write().set_page_size(size);
                        }
                    },
                }
                if let Some((status_field, _)) = status_dropdown {
                    DropdownSelect {
                        id: DropdownId::Status,
                        label: "Status",
                        options: status_options,
                        selected: Some(status_filter()),
                        open_dropdown,
                        dropdown_pos,
                        on_select: move |value: String| {
                            let constraint = (value != ALL_STATUSES).then(|| {
                                FieldConstraint::equals(status_field, FieldValue::text(&value))
                            });
                            status_filter.set(value);
                            open_row.set(None);
                            controller.write().set_constraint(status_field, constraint);
                        },
                    }
                }
                if let Some(date_field) = date_field {
                    span { "From" }
                    input {
                        style: "{FILTER_INPUT_STYLE}",
                        r#type: "date",
                        value: "{date_from}",
                        oninput: move |event| {
                            date_from.set(event.value());
                            open_row.set(None);
                            let constraint = date_range_input(date_field, &date_from(), &date_to());
                            controller.write().set_constraint(date_field, constraint);
                        },
                    }
                    span { "To" }
                    input {
                        style: "{FILTER_INPUT_STYLE}",
                        r#type: "date",
                        value: "{date_to}",
                        oninput: move |event| {
                            date_to.set(event.value());
                            open_row.set(None);
                            let constraint = date_range_input(date_field, &date_from(), &date_to());
                            controller.write().set_constraint(date_field, constraint);
                        },
                    }
                }
                if current_entity == AdminEntity::Deals {
                    input {
                        style: "{FILTER_INPUT_STYLE}",
                        placeholder: "Developer",
                        value: "{developer_filter}",
                        oninput: move |event| {
                            developer_filter.set(event.value());
                            open_row.set(None);
                            let constraint = contains_input("developer_name", &developer_filter());
                            controller.write().set_constraint("developer_name", constraint);
                        },
                    }
                    input {
                        style: "{FILTER_INPUT_STYLE}",
                        placeholder: "Min value",
                        value: "{min_value}",
                        oninput: move |event| {
                            min_value.set(event.value());
                            open_row.set(None);
                            let constraint = value_range_input("deal_value", &min_value(), &max_value());
                            controller.write().set_constraint("deal_value", constraint);
                        },
                    }
                    input {
                        style: "{FILTER_INPUT_STYLE}",
                        placeholder: "Max value",
                        value: "{max_value}",
                        oninput: move |event| {
                            max_value.set(event.value());
                            open_row.set(None);
                            let constraint = value_range_input("deal_value", &min_value(), &max_value());
                            controller.write().set_constraint("deal_value", constraint);
                        },
                    }
                }
                if current_entity == AdminEntity::Commissions {
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            let Some(path) = FileDialog::new()
                                .add_filter("Commission sheet", &["json", "xlsx", "xlsm", "xls", "ods"])
                                .pick_file()
                            else {
                                return;
                            };
                            match run_blocking(|| import_for_sheet.preview_live_commissions(&path)) {
                                Ok(entries) => {
                                    config.write().live_commissions_path = Some(path.clone());
                                    let mut table = build_controller(
                                        AdminEntity::Commissions,
                                        &config.read(),
                                        &repo_for_sheet,
                                    );
                                    table.refresh();
                                    controller.set(table);
                                    open_row.set(None);
                                    status.set(format!(
                                        "Using {} commission entries from {}",
                                        entries.len(),
                                        path.display()
                                    ));
                                }
                                Err(err) => status.set(format!("Commission sheet rejected: {err:#}")),
                            }
                        },
                        "Load commission sheet"
                    }
                }
                if can_create {
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            let opened = controller.read().edit_form(None);
                            match opened {
                                Ok(next) => {
                                    open_row.set(None);
                                    form_error.set(None);
                                    form.set(Some(next));
                                }
                                Err(err) => status.set(format!("Cannot add a row: {err}")),
                            }
                        },
                        "New"
                    }
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        *busy.write() = true;
                        let mut table = controller.write();
                        table.refresh();
                        status.set(status_after_load(&**table));
                        *busy.write() = false;
                    },
                    "Refresh"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let Some(path) = FileDialog::new()
                            .set_file_name(entity().csv_filename())
                            .add_filter("CSV", &["csv"])
                            .save_file()
                        else {
                            return;
                        };
                        match controller.read().export_csv(&path) {
                            Ok(count) => status.set(format!("Exported {count} rows to {}", path.display())),
                            Err(err) => status.set(format!("Export failed: {err:#}")),
                        }
                    },
                    "Export CSV"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let Some(path) = FileDialog::new()
                            .add_filter("CSV", &["csv"])
                            .pick_file()
                        else {
                            return;
                        };
                        *busy.write() = true;
                        match run_blocking(|| import_service.import_inventory_csv(&path)) {
                            Ok(result) => {
                                controller.write().refresh();
                                status.set(format!(
                                    "Imported {} properties ({} skipped)",
                                    result.row_count, result.skipped
                                ));
                            }
                            Err(err) => status.set(format!("Import failed: {err:#}")),
                        }
                        *busy.write() = false;
                    },
                    "Import inventory CSV"
                }
                if selected_count > 0 {
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            let confirm = MessageDialog::new()
                                .set_level(MessageLevel::Warning)
                                .set_title("Delete rows")
                                .set_description(format!("Delete {selected_count} selected rows?"))
                                .set_buttons(MessageButtons::YesNo)
                                .show();
                            if confirm != MessageDialogResult::Yes {
                                return;
                            }
                            match controller.write().delete_selected() {
                                Ok(count) => status.set(format!("Deleted {count} rows")),
                                Err(err) => status.set(format!("Delete failed: {err}")),
                            }
                        },
                        "Delete selected ({selected_count})"
                    }
                }
            }

            div {
                style: "display: flex; gap: 12px; flex: 1; min-height: 0;",
                DataTable {
                    snapshot: snapshot,
                    on_sort: move |column: String| controller.write().sort_by(&column),
                    on_row: move |interaction| {
                        if let Some(key) = controller.write().interact(interaction) {
                            form.set(None);
                            open_row.set(Some(key));
                        }
                    },
                    on_toggle_page: move |selected| controller.write().toggle_page(selected),
                    on_page: move |page| controller.write().set_page(page),
                }
                if let Some(current_form) = open_form {
                    EditFormPanel {
                        key: "{form_key}",
                        form: current_form,
                        error: form_error(),
                        on_cancel: move |_| form.set(None),
                        on_save: move |values: Vec<(String, String)>| {
                            let saved = controller.write().save_form(form_row.as_ref(), &values);
                            match saved {
                                Ok(()) => {
                                    let done = if form_row.is_some() { "Row updated" } else { "Row added" };
                                    form.set(None);
                                    form_error.set(None);
                                    status.set(done.to_string());
                                }
                                Err(err) => form_error.set(Some(err.to_string())),
                            }
                        },
                    }
                } else if let Some((key, fields, actions)) = details {
                    DetailsPanel {
                        row_key: key,
                        fields,
                        actions,
                        on_close: move |_| open_row.set(None),
                        on_edit: move |key: RowKey| {
                            let opened = controller.read().edit_form(Some(&key));
                            match opened {
                                Ok(next) => {
                                    form_error.set(None);
                                    form.set(Some(next));
                                }
                                Err(err) => status.set(format!("Cannot edit row: {err}")),
                            }
                        },
                        on_action: move |(key, label): (RowKey, &'static str)| {
                            let done = controller.write().run_action(&key, label);
                            match done {
                                Ok(()) => status.set(format!("{label} applied")),
                                Err(err) => status.set(format!("{label} failed: {err}")),
                            }
                        },
                        on_delete: move |key: RowKey| {
                            let confirm = MessageDialog::new()
                                .set_level(MessageLevel::Warning)
                                .set_title("Delete row")
                                .set_description("Delete this row?")
                                .set_buttons(MessageButtons::YesNo)
                                .show();
                            if confirm != MessageDialogResult::Yes {
                                return;
                            }
                            match controller.write().delete_row(&key) {
                                Ok(()) => {
                                    open_row.set(None);
                                    status.set("Row deleted".to_string());
                                }
                                Err(err) => status.set(format!("Delete failed: {err}")),
                            }
                        },
                    }
                }
            }

            div {
                style: "color: #444; font-size: 13px;",
                "{status}"
            }
        }
    }
}

#[component]
fn DetailsPanel(
    row_key: RowKey,
    fields: Vec<(String, String)>,
    actions: Vec<&'static str>,
    on_close: EventHandler<()>,
    on_edit: EventHandler<RowKey>,
    on_action: EventHandler<(RowKey, &'static str)>,
    on_delete: EventHandler<RowKey>,
) -> Element {
    let writable = matches!(row_key, RowKey::Id(_));
    let edit_key = row_key.clone();
    let delete_key = row_key.clone();

    rsx! {
        div {
            style: "width: 320px; border: 1px solid #ddd; border-radius: 8px; padding: 12px; overflow-y: auto; display: flex; flex-direction: column; gap: 8px;",
            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                strong { "Details" }
                button { onclick: move |_| on_close.call(()), "Close" }
            }
            {fields.iter().map(|(name, value)| {
                let name = name.clone();
                let value = value.clone();
                rsx!(
                    div {
                        key: "{name}",
                        div { style: "color: #777; font-size: 12px;", "{name}" }
                        div { style: "word-break: break-word;", "{value}" }
                    }
                )
            })}
            if writable {
                div {
                    style: "display: flex; gap: 6px; flex-wrap: wrap;",
                    {actions.iter().copied().map(|label| {
                        let key = row_key.clone();
                        rsx!(
                            button {
                                key: "{label}",
                                onclick: move |_| on_action.call((key.clone(), label)),
                                "{label}"
                            }
                        )
                    })}
                    button { onclick: move |_| on_edit.call(edit_key.clone()), "Edit" }
                }
                button {
                    style: "border: 1px solid #c33; color: #c33; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;",
                    onclick: move |_| on_delete.call(delete_key.clone()),
                    "Delete"
                }
            } else {
                p { style: "color: #777; font-size: 12px;", "Inferred from another dataset; read-only." }
            }
        }
    }
}
