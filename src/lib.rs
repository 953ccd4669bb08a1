pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod estimation;
pub mod intake;
pub mod state;
pub mod store;
