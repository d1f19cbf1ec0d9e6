// ABOUTME: Constants and environment variable names
// ABOUTME: Centralized definitions of default paths, table names and env var names

use std::env;
use std::path::PathBuf;

/// Table used when a store is not given an explicit table name
pub const DEFAULT_TABLE_NAME: &str = "Settings";

/// File name of the default SQLite database inside the setstore directory
pub const DEFAULT_DATABASE_FILE: &str = "settings.db";

// Storage Configuration
pub const SETSTORE_DB_PATH: &str = "SETSTORE_DB_PATH";
pub const SETSTORE_TABLE: &str = "SETSTORE_TABLE";
pub const SETSTORE_ENABLE_WAL: &str = "SETSTORE_ENABLE_WAL";
pub const SETSTORE_MAX_CONNECTIONS: &str = "SETSTORE_MAX_CONNECTIONS";
pub const SETSTORE_BUSY_TIMEOUT_SECS: &str = "SETSTORE_BUSY_TIMEOUT_SECS";

// System Environment Variables
pub const HOME: &str = "HOME";

/// Get the path to the setstore directory (~/.setstore)
pub fn setstore_dir() -> PathBuf {
    // HOME wins so tests can redirect it
    if let Ok(home) = env::var(HOME) {
        PathBuf::from(home).join(".setstore")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".setstore")
    }
}

/// Get the path to the default settings database (~/.setstore/settings.db)
pub fn default_database_path() -> PathBuf {
    setstore_dir().join(DEFAULT_DATABASE_FILE)
}
