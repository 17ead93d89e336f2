pub mod config;
pub mod file_formats;
pub mod health;
pub mod snapshot;
