use chrono::NaiveDate;

use crate::domain::entities::admin::{
    AdminEntity, APPLICATION_STATUSES, DEAL_REVIEW_STATUSES, USER_ROLES,
};
use crate::domain::entities::listing::FieldConstraint;

/// Field and choices behind the status dropdown of an entity, if it has one.
pub fn status_filter_for(entity: AdminEntity) -> Option<(&'static str, &'static [&'static str])> {
    match entity {
        AdminEntity::Applications => Some(("status", APPLICATION_STATUSES)),
        AdminEntity::Deals => Some(("review_status", DEAL_REVIEW_STATUSES)),
        AdminEntity::Users => Some(("role", USER_ROLES)),
        _ => None,
    }
}

/// Date field behind the from/to inputs of an entity, if it has them.
pub fn date_filter_for(entity: AdminEntity) -> Option<&'static str> {
    match entity {
        AdminEntity::Applications | AdminEntity::Deals => Some("created_at"),
        _ => None,
    }
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

/// Unparseable bounds are left open; no bounds at all clears the filter.
pub fn date_range_input(field: &str, from: &str, to: &str) -> Option<FieldConstraint> {
    let (from, to) = (parse_day(from), parse_day(to));
    (from.is_some() || to.is_some()).then(|| FieldConstraint::date_range(field, from, to))
}

pub fn value_range_input(field: &str, min: &str, max: &str) -> Option<FieldConstraint> {
    let (min, max) = (parse_amount(min), parse_amount(max));
    (min.is_some() || max.is_some()).then(|| FieldConstraint::number_range(field, min, max))
}

pub fn contains_input(field: &str, text: &str) -> Option<FieldConstraint> {
    let text = text.trim();
    (!text.is_empty()).then(|| FieldConstraint::contains(field, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_inputs_build_an_open_ended_range() {
        assert_eq!(
            date_range_input("created_at", "2024-01-01", ""),
            Some(FieldConstraint::date_range(
                "created_at",
                NaiveDate::from_ymd_opt(2024, 1, 1),
                None
            ))
        );
        assert_eq!(date_range_input("created_at", "", ""), None);
        assert_eq!(date_range_input("created_at", "soon", "later"), None);
    }

    #[test]
    fn value_inputs_accept_separators() {
        assert_eq!(
            value_range_input("deal_value", "1,000,000", "abc"),
            Some(FieldConstraint::number_range("deal_value", Some(1_000_000.0), None))
        );
        assert_eq!(value_range_input("deal_value", " ", ""), None);
    }

    #[test]
    fn blank_developer_text_clears_the_filter() {
        assert_eq!(contains_input("developer_name", "  "), None);
        assert_eq!(
            contains_input("developer_name", " Emaar "),
            Some(FieldConstraint::contains("developer_name", "Emaar"))
        );
    }

    #[test]
    fn review_entities_expose_status_and_date_filters() {
        assert_eq!(
            status_filter_for(AdminEntity::Deals).map(|(field, _)| field),
            Some("review_status")
        );
        assert_eq!(date_filter_for(AdminEntity::Applications), Some("created_at"));
        assert_eq!(date_filter_for(AdminEntity::Developers), None);
    }
}
