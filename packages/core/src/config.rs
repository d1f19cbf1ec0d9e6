// ABOUTME: Store configuration with environment overrides
// ABOUTME: Database location, table binding and SQLite pool tuning

use crate::constants::{
    default_database_path, DEFAULT_TABLE_NAME, SETSTORE_BUSY_TIMEOUT_SECS, SETSTORE_DB_PATH,
    SETSTORE_ENABLE_WAL, SETSTORE_MAX_CONNECTIONS, SETSTORE_TABLE,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Storage configuration for a settings store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    pub table_name: String,
    pub enable_wal: bool,
    pub max_connections: u32,
    pub busy_timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            enable_wal: true,
            max_connections: 5,
            busy_timeout_seconds: 30,
        }
    }
}

impl StoreConfig {
    /// Build a configuration from defaults overlaid with `SETSTORE_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration using `lookup` to resolve variable names
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = non_empty(lookup(SETSTORE_DB_PATH)) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(table) = non_empty(lookup(SETSTORE_TABLE)) {
            config.table_name = table;
        }

        if let Some(raw) = non_empty(lookup(SETSTORE_ENABLE_WAL)) {
            match parse_flag(&raw) {
                Some(enabled) => config.enable_wal = enabled,
                None => warn!("Ignoring invalid {}: {}", SETSTORE_ENABLE_WAL, raw),
            }
        }

        if let Some(max) =
            parse_number::<u32>(SETSTORE_MAX_CONNECTIONS, lookup(SETSTORE_MAX_CONNECTIONS))
        {
            config.max_connections = max.max(1);
        }

        if let Some(secs) =
            parse_number::<u64>(SETSTORE_BUSY_TIMEOUT_SECS, lookup(SETSTORE_BUSY_TIMEOUT_SECS))
        {
            config.busy_timeout_seconds = secs;
        }

        config
    }

    /// Same configuration bound to a different table
    pub fn with_table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Same configuration pointing at a different database file
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_number<T: FromStr>(name: &str, value: Option<String>) -> Option<T> {
    let raw = non_empty(value)?;
    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid {}: {}", name, raw);
            None
        }
    }
}
