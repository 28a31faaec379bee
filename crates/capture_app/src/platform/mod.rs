pub mod app;
pub mod config;
pub mod devices;
pub mod ui;
