// ABOUTME: SQLite implementation of the settings backend
// ABOUTME: One flat (key, group, value, type) table per backend instance

use async_trait::async_trait;
use setstore_core::StoreConfig;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::{SettingRecord, SettingType, SettingsBackend, StorageError, StorageResult};

const MAX_TABLE_NAME_LEN: usize = 64;

/// SQLite implementation of SettingsBackend
pub struct SqliteBackend {
    pool: SqlitePool,
    table: String,
}

impl SqliteBackend {
    /// Bind an existing pool to `table`. The table name is validated here;
    /// call [`SqliteBackend::initialize`] to create the table if needed.
    pub fn new(pool: SqlitePool, table: impl Into<String>) -> StorageResult<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self { pool, table })
    }

    /// Open the database described by `config`, creating the file and table if missing
    pub async fn connect(config: &StoreConfig) -> StorageResult<Self> {
        validate_table_name(&config.table_name)?;

        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }

        let database_url = format!("sqlite:{}", config.database_path.display());

        if !sqlx::Sqlite::database_exists(&database_url)
            .await
            .map_err(StorageError::Sqlx)?
        {
            debug!("Creating database at: {}", database_url);
            sqlx::Sqlite::create_database(&database_url)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.busy_timeout_seconds))
            .connect(&database_url)
            .await
            .map_err(StorageError::Sqlx)?;

        if config.enable_wal {
            sqlx::query("PRAGMA journal_mode = WAL")
                .execute(&pool)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let backend = Self::new(pool, config.table_name.clone())?;
        backend.initialize().await?;
        Ok(backend)
    }

    /// Create the settings table and its group index if they do not exist
    pub async fn initialize(&self) -> StorageResult<()> {
        info!("Initializing settings table {}", self.table);

        let create_table = format!(
            r#"CREATE TABLE IF NOT EXISTS "{table}" (
                key TEXT NOT NULL,
                "group" TEXT NOT NULL,
                value TEXT NOT NULL,
                type TEXT NOT NULL,
                PRIMARY KEY (key, "group")
            )"#,
            table = self.table
        );
        sqlx::query(&create_table)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let create_index = format!(
            r#"CREATE INDEX IF NOT EXISTS "{table}_group_idx" ON "{table}" ("group")"#,
            table = self.table
        );
        sqlx::query(&create_index)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn get_by_key_group(
        &self,
        key: &str,
        group: &str,
    ) -> StorageResult<Option<SettingRecord>> {
        debug!("Fetching {}/{} from {}", group, key, self.table);

        let sql = format!(
            r#"SELECT key, "group", value, type FROM "{}" WHERE key = ? AND "group" = ?"#,
            self.table
        );
        sqlx::query_as::<_, SettingRecord>(&sql)
            .bind(key)
            .bind(group)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)
    }

    async fn set_by_key_group(&self, key: &str, value: &str, group: &str) -> StorageResult<()> {
        debug!("Updating {}/{} in {}", group, key, self.table);

        let sql = format!(
            r#"UPDATE "{}" SET value = ? WHERE key = ? AND "group" = ?"#,
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(value)
            .bind(key)
            .bind(group)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                key: key.to_string(),
                group: group.to_string(),
            });
        }

        Ok(())
    }

    async fn get_all_group(&self, group: &str) -> StorageResult<Vec<SettingRecord>> {
        debug!("Fetching group {} from {}", group, self.table);

        let sql = format!(
            r#"SELECT key, "group", value, type FROM "{}" WHERE "group" = ? ORDER BY key"#,
            self.table
        );
        sqlx::query_as::<_, SettingRecord>(&sql)
            .bind(group)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)
    }

    async fn new_setting(
        &self,
        key: &str,
        value: &str,
        setting_type: SettingType,
        group: &str,
    ) -> StorageResult<()> {
        debug!("Inserting {}/{} ({}) into {}", group, key, setting_type, self.table);

        let sql = format!(
            r#"INSERT INTO "{}" (key, "group", value, type) VALUES (?, ?, ?, ?)"#,
            self.table
        );
        sqlx::query(&sql)
            .bind(key)
            .bind(group)
            .bind(value)
            .bind(setting_type.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    StorageError::Conflict {
                        key: key.to_string(),
                        group: group.to_string(),
                    }
                }
                other => StorageError::Sqlx(other),
            })?;

        Ok(())
    }

    async fn remove_by_group(&self, group: &str) -> StorageResult<()> {
        let sql = format!(r#"DELETE FROM "{}" WHERE "group" = ?"#, self.table);
        let result = sqlx::query(&sql)
            .bind(group)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        debug!(
            "Removed {} rows of group {} from {}",
            result.rows_affected(),
            group,
            self.table
        );
        Ok(())
    }

    async fn remove_by_key_group(&self, key: &str, group: &str) -> StorageResult<()> {
        let sql = format!(
            r#"DELETE FROM "{}" WHERE key = ? AND "group" = ?"#,
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(key)
            .bind(group)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        debug!(
            "Removed {} rows for {}/{} from {}",
            result.rows_affected(),
            group,
            key,
            self.table
        );
        Ok(())
    }

    async fn optimize(&self) -> StorageResult<()> {
        sqlx::query("VACUUM")
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass
fn validate_table_name(table: &str) -> StorageResult<()> {
    let mut chars = table.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest || table.len() > MAX_TABLE_NAME_LEN {
        return Err(StorageError::InvalidInput(format!(
            "Invalid table name: {:?}",
            table
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("Settings").is_ok());
        assert!(validate_table_name("_app_settings2").is_ok());

        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("2fast").is_err());
        assert!(validate_table_name("settings; DROP TABLE x").is_err());
        assert!(validate_table_name("quoted\"name").is_err());
        assert!(validate_table_name(&"a".repeat(65)).is_err());
    }
}
