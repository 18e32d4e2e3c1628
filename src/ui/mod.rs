pub mod components;
pub mod controller;
pub mod state;
