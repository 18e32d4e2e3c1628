use chrono::NaiveDate;

use crate::domain::entities::record::{FieldValue, Record, RecordId, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Number,
    Date,
    Flag,
    Choice(&'static [&'static str]),
    /// Id of a stored developer.
    Developer,
    /// Id of a stored project.
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FormField {
    pub const fn required(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
        }
    }
}

/// One-click change of a single form field, e.g. approving an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub field: &'static str,
    pub value: &'static str,
}

/// Records the admin screens can edit through a form.
pub trait Editable: Record + Default {
    /// Whether new rows may be added from the admin screen.
    const CREATABLE: bool;

    fn form_fields() -> &'static [FormField];

    fn set_form_value(&mut self, field: &FormField, value: &str) -> Result<(), ValidationError>;

    fn quick_actions() -> &'static [QuickAction] {
        &[]
    }

    /// Current value of a form field as the input shows it.
    fn form_value(&self, key: &str) -> String {
        match self.field(key) {
            FieldValue::Bool(flag) => flag.to_string(),
            value => value.to_string(),
        }
    }
}

/// Copies submitted values onto `record`. Fields absent from `values` are
/// treated as blank.
pub fn apply_form<T: Editable>(
    record: &mut T,
    values: &[(String, String)],
) -> Result<(), ValidationError> {
    for field in T::form_fields() {
        let value = values
            .iter()
            .find(|(key, _)| key == field.key)
            .map(|(_, value)| value.trim())
            .unwrap_or_default();
        if field.required && value.is_empty() {
            return Err(ValidationError::Required(field.key));
        }
        record.set_form_value(field, value)?;
    }
    Ok(())
}

/// Applies one quick action, leaving every other field untouched.
pub fn apply_action<T: Editable>(
    record: &mut T,
    action: &QuickAction,
) -> Result<(), ValidationError> {
    let field = T::form_fields()
        .iter()
        .find(|field| field.key == action.field)
        .ok_or(ValidationError::Required(action.field))?;
    record.set_form_value(field, action.value)
}

pub fn text_value(value: &str) -> String {
    value.trim().to_string()
}

pub fn opt_text_value(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Blank is `None`. Thousands separators are accepted.
pub fn number_value(field: &FormField, value: &str) -> Result<Option<f64>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .map(Some)
        .ok_or(ValidationError::NotANumber(field.key))
}

pub fn id_value(field: &FormField, value: &str) -> Result<Option<RecordId>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(|id| Some(RecordId(id)))
        .map_err(|_| ValidationError::NotANumber(field.key))
}

/// Dates are entered and stored as `YYYY-MM-DD`.
pub fn date_value(field: &FormField, value: &str) -> Result<Option<String>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|day| Some(day.format("%Y-%m-%d").to_string()))
        .map_err(|_| ValidationError::NotADate(field.key))
}

pub fn flag_value(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1" | "on"
    )
}

/// Blank is `None`; anything else must be one of the field's choices.
pub fn choice_value(field: &FormField, value: &str) -> Result<Option<String>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let options: &[&str] = match field.kind {
        FieldKind::Choice(options) => options,
        _ => &[],
    };
    check_choice(field.key, value, options)?;
    Ok(Some(value.to_string()))
}

pub fn check_choice(
    field: &'static str,
    value: &str,
    options: &[&str],
) -> Result<(), ValidationError> {
    if options.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::NotAllowed {
            field,
            value: value.to_string(),
        })
    }
}
