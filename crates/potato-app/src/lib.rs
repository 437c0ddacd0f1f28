pub mod catalog;
pub mod error;
pub mod rest_api;
pub mod state;
