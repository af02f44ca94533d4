pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod images;
pub mod inventory;
pub mod items;
pub mod profile;
pub mod shopping;
pub mod state;
pub mod store;
pub mod ui;
