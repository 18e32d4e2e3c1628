pub mod data_table;
pub mod edit_form;
