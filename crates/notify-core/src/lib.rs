pub mod config;
pub mod event;
pub mod grid;
pub mod sanitize;
pub mod templates;
