pub mod client;
pub mod config;
pub mod models;
pub mod shell;
pub mod ui;
