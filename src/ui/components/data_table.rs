use dioxus::prelude::*;

use crate::ui::controller::TableSnapshot;
use crate::usecase::list_view::{LoadState, RowInteraction};

const CELL_STYLE: &str = "padding: 6px 10px; border-bottom: 1px solid #eee; text-align: left;";
const HEADER_STYLE: &str = "padding: 8px 10px; border-bottom: 2px solid #ccc; text-align: left; background: #fafafa; position: sticky; top: 0; user-select: none;";
const PAGE_BUTTON_STYLE: &str = "border: 1px solid #bbb; background: #fff; padding: 3px 9px; border-radius: 6px; cursor: pointer;";

/// Generic admin table: sortable headers, page-scoped select-all, row
/// click and checkbox click reported separately, pagination footer.
#[component]
pub fn DataTable(
    snapshot: TableSnapshot,
    on_sort: EventHandler<String>,
    on_row: EventHandler<RowInteraction>,
    on_toggle_page: EventHandler<bool>,
    on_page: EventHandler<usize>,
) -> Element {
    let page_selected = snapshot.page_selected;
    let column_span = snapshot.columns.len() + 1;
    let loading = snapshot.state == LoadState::Loading;
    let page = snapshot.page;
    let total_pages = snapshot.total_pages;
    let has_previous = snapshot.has_previous;
    let has_next = snapshot.has_next;
    let range_label = snapshot.range_label.clone();
    let empty_message = snapshot.empty_message;

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 8px; min-height: 0; flex: 1;",
            div {
                style: "overflow: auto; border: 1px solid #ddd; border-radius: 8px; flex: 1;",
                table {
                    style: "border-collapse: collapse; width: 100%; font-size: 14px;",
                    thead {
                        tr {
                            th {
                                style: "{HEADER_STYLE} width: 32px;",
                                input {
                                    r#type: "checkbox",
                                    checked: page_selected,
                                    disabled: snapshot.rows.is_empty(),
                                    onclick: move |event| {
                                        event.stop_propagation();
                                        on_toggle_page.call(!page_selected);
                                    }
                                }
                            }
                            {snapshot.columns.iter().map(|column| {
                                let key = column.key;
                                let label = column.label;
                                let sortable = column.sortable;
                                let indicator = column.sort.map(|dir| dir.indicator()).unwrap_or("");
                                let cursor = if sortable { "pointer" } else { "default" };
                                rsx!(
                                    th {
                                        key: "{key}",
                                        style: "{HEADER_STYLE} cursor: {cursor};",
                                        onclick: move |_| {
                                            if sortable {
                                                on_sort.call(key.to_string());
                                            }
                                        },
                                        "{label} {indicator}"
                                    }
                                )
                            })}
                        }
                    }
                    tbody {
                        if loading && snapshot.rows.is_empty() {
                            tr {
                                td { colspan: "{column_span}", style: "{CELL_STYLE} color: #666;", "Loading…" }
                            }
                        } else if snapshot.rows.is_empty() {
                            tr {
                                td { colspan: "{column_span}", style: "{CELL_STYLE} color: #666; text-align: center;", "{empty_message}" }
                            }
                        }
                        {snapshot.rows.iter().map(|row| {
                            let row_id = row.key.to_string();
                            let row_key = row.key.clone();
                            let check_key = row.key.clone();
                            let selected = row.selected;
                            let background = if selected { "#eef4ff" } else { "transparent" };
                            let origin_hint = if row.read_only { "font-style: italic;" } else { "" };
                            let cells = row.cells.clone();
                            rsx!(
                                tr {
                                    key: "{row_id}",
                                    style: "cursor: pointer; background: {background}; {origin_hint}",
                                    onclick: move |_| on_row.call(RowInteraction::Open(row_key.clone())),
                                    td {
                                        style: "{CELL_STYLE}",
                                        input {
                                            r#type: "checkbox",
                                            checked: selected,
                                            onclick: move |event| {
                                                event.stop_propagation();
                                                on_row.call(RowInteraction::Check {
                                                    key: check_key.clone(),
                                                    selected: !selected,
                                                });
                                            }
                                        }
                                    }
                                    {cells.into_iter().map(|cell| rsx!(
                                        td { style: "{CELL_STYLE}", "{cell}" }
                                    ))}
                                }
                            )
                        })}
                    }
                }
            }
            div {
                style: "display: flex; align-items: center; justify-content: space-between; gap: 12px;",
                span { style: "color: #555;", "{range_label}" }
                div {
                    style: "display: flex; align-items: center; gap: 4px;",
                    button {
                        style: "{PAGE_BUTTON_STYLE}",
                        disabled: !has_previous,
                        onclick: move |_| on_page.call(page.saturating_sub(1)),
                        "Previous"
                    }
                    {snapshot.page_window.iter().copied().map(|number| {
                        let weight = if number == page { "700" } else { "400" };
                        rsx!(
                            button {
                                key: "{number}",
                                style: "{PAGE_BUTTON_STYLE} font-weight: {weight};",
                                onclick: move |_| on_page.call(number),
                                "{number}"
                            }
                        )
                    })}
                    button {
                        style: "{PAGE_BUTTON_STYLE}",
                        disabled: !has_next,
                        onclick: move |_| on_page.call(page + 1),
                        "Next"
                    }
                    span { style: "color: #555; margin-left: 8px;", "Page {page} of {total_pages}" }
                }
            }
        }
    }
}
