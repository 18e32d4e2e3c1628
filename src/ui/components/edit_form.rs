use dioxus::prelude::*;

use crate::domain::entities::form::FieldKind;
use crate::ui::controller::EditForm;

const INPUT_STYLE: &str = "padding: 5px 8px; border: 1px solid #bbb; border-radius: 6px; width: 100%; box-sizing: border-box;";

fn set_value(mut values: Signal<Vec<(String, String)>>, key: &str, value: String) {
    if let Some(entry) = values.write().iter_mut().find(|(k, _)| k == key) {
        entry.1 = value;
    }
}

/// Create/edit form for one row. Values are submitted as typed; parsing and
/// validation happen in the controller.
#[component]
pub fn EditFormPanel(
    form: EditForm,
    error: Option<String>,
    on_save: EventHandler<Vec<(String, String)>>,
    on_cancel: EventHandler<()>,
) -> Element {
    let initial: Vec<(String, String)> = form
        .inputs
        .iter()
        .map(|input| (input.key.to_string(), input.value.clone()))
        .collect();
    let values = use_signal(|| initial);
    let title = if form.row.is_some() { "Edit row" } else { "New row" };

    rsx! {
        div {
            style: "width: 320px; border: 1px solid #ddd; border-radius: 8px; padding: 12px; overflow-y: auto; display: flex; flex-direction: column; gap: 10px;",
            strong { "{title}" }
            {form.inputs.iter().map(|input| {
                let key = input.key;
                let current = values
                    .read()
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default();
                let marker = if input.required { " *" } else { "" };
                let label = input.label;
                let field = match input.kind {
                    FieldKind::LongText => rsx!(
                        textarea {
                            style: "{INPUT_STYLE}",
                            rows: "3",
                            value: "{current}",
                            oninput: move |event| set_value(values, key, event.value()),
                        }
                    ),
                    FieldKind::Flag => {
                        let checked = current == "true";
                        rsx!(
                            input {
                                r#type: "checkbox",
                                checked: checked,
                                onclick: move |_| set_value(values, key, (!checked).to_string()),
                            }
                        )
                    }
                    FieldKind::Choice(_) | FieldKind::Developer | FieldKind::Project => {
                        let options = input.options.clone();
                        rsx!(
                            select {
                                style: "{INPUT_STYLE}",
                                value: "{current}",
                                onchange: move |event| set_value(values, key, event.value()),
                                option { value: "", selected: current.is_empty(), "(none)" }
                                {options.into_iter().map(|(value, text)| {
                                    let selected = value == current;
                                    rsx!(option { key: "{value}", value: "{value}", selected: selected, "{text}" })
                                })}
                            }
                        )
                    }
                    FieldKind::Date => rsx!(
                        input {
                            style: "{INPUT_STYLE}",
                            r#type: "date",
                            value: "{current}",
                            oninput: move |event| set_value(values, key, event.value()),
                        }
                    ),
                    FieldKind::Text | FieldKind::Number => rsx!(
                        input {
                            style: "{INPUT_STYLE}",
                            value: "{current}",
                            oninput: move |event| set_value(values, key, event.value()),
                        }
                    ),
                };
                rsx!(
                    div {
                        key: "{key}",
                        div { style: "color: #777; font-size: 12px; margin-bottom: 2px;", "{label}{marker}" }
                        {field}
                    }
                )
            })}
            if let Some(error) = error {
                p { style: "color: #c33; font-size: 13px; margin: 0;", "{error}" }
            }
            div {
                style: "display: flex; gap: 8px;",
                button { onclick: move |_| on_save.call(values()), "Save" }
                button { onclick: move |_| on_cancel.call(()), "Cancel" }
            }
        }
    }
}
