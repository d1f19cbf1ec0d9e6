// ABOUTME: Persistence layer for typed settings rows
// ABOUTME: Backend trait, storage errors, and the SQLite and in-memory backends

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod sqlite;
pub mod types;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
pub use types::{SettingRecord, SettingType};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Setting not found: {key} in group {group}")]
    NotFound { key: String, group: String },
    #[error("Setting already exists: {key} in group {group}")]
    Conflict { key: String, group: String },
    #[error("Unsupported setting type: {0}")]
    UnsupportedType(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Row-level persistence for settings keyed by (key, group).
///
/// A backend is bound to one table when it is constructed. Values cross this
/// boundary as canonical strings; typing happens in the layer above.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Fetch one row, `None` when (key, group) does not exist
    async fn get_by_key_group(&self, key: &str, group: &str)
        -> StorageResult<Option<SettingRecord>>;

    /// Overwrite the value of an existing row. Fails with `NotFound` when absent.
    async fn set_by_key_group(&self, key: &str, value: &str, group: &str) -> StorageResult<()>;

    /// All rows of a group ordered by key
    async fn get_all_group(&self, group: &str) -> StorageResult<Vec<SettingRecord>>;

    /// Insert a new row. Fails with `Conflict` when (key, group) already exists.
    async fn new_setting(
        &self,
        key: &str,
        value: &str,
        setting_type: SettingType,
        group: &str,
    ) -> StorageResult<()>;

    async fn remove_by_group(&self, group: &str) -> StorageResult<()>;

    async fn remove_by_key_group(&self, key: &str, group: &str) -> StorageResult<()>;

    /// Storage compaction, run after deletes
    async fn optimize(&self) -> StorageResult<()>;
}
