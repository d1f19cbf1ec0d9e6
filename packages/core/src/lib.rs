// ABOUTME: Shared constants and configuration for setstore
// ABOUTME: Foundational package used by the storage and settings packages

pub mod config;
pub mod constants;

// Re-export configuration
pub use config::StoreConfig;

// Re-export constants
pub use constants::{default_database_path, setstore_dir, DEFAULT_TABLE_NAME};
