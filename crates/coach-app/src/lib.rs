pub mod app;
pub mod commands;
pub mod config;
pub mod feed;
pub mod view;

pub use app::ChatApp;
pub use config::AppConfig;
