pub mod config;
pub mod date_utils;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

/// Version string taken from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
