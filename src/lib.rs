pub mod affordances;
pub mod app;
pub mod cli;
pub mod config;
pub mod document;
pub mod landing;
pub mod logging;
pub mod models;
pub mod outline;
pub mod preferences;
pub mod settings;
pub mod theme;
pub mod tracker;
pub mod ui;
