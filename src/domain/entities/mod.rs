pub mod admin;
pub mod form;
pub mod listing;
pub mod pagination;
pub mod record;
pub mod selection;
