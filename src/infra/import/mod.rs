pub mod commissions;
pub mod csv;
pub mod xlsx;
