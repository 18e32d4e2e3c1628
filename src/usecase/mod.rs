pub mod export;
pub mod filter;
pub mod list_view;
pub mod ports;
pub mod reconcile;
pub mod request;
pub mod services;
