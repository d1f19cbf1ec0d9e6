// ABOUTME: In-memory implementation of the settings backend
// ABOUTME: Ordered map keyed by (group, key); contents are lost on drop

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::{SettingRecord, SettingType, SettingsBackend, StorageError, StorageResult};

type RowKey = (String, String);

/// An in-memory backend with the same uniqueness rules as the SQLite table.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    rows: Mutex<BTreeMap<RowKey, SettingRecord>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw rows. Later duplicates of (key, group) replace earlier ones.
    pub fn with_records(records: impl IntoIterator<Item = SettingRecord>) -> Self {
        let rows = records
            .into_iter()
            .map(|r| ((r.group.clone(), r.key.clone()), r))
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<RowKey, SettingRecord>> {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn row_key(key: &str, group: &str) -> RowKey {
    (group.to_string(), key.to_string())
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    async fn get_by_key_group(
        &self,
        key: &str,
        group: &str,
    ) -> StorageResult<Option<SettingRecord>> {
        Ok(self.lock().get(&row_key(key, group)).cloned())
    }

    async fn set_by_key_group(&self, key: &str, value: &str, group: &str) -> StorageResult<()> {
        match self.lock().get_mut(&row_key(key, group)) {
            Some(record) => {
                record.value = value.to_string();
                Ok(())
            }
            None => Err(StorageError::NotFound {
                key: key.to_string(),
                group: group.to_string(),
            }),
        }
    }

    async fn get_all_group(&self, group: &str) -> StorageResult<Vec<SettingRecord>> {
        Ok(self
            .lock()
            .values()
            .filter(|r| r.group == group)
            .cloned()
            .collect())
    }

    async fn new_setting(
        &self,
        key: &str,
        value: &str,
        setting_type: SettingType,
        group: &str,
    ) -> StorageResult<()> {
        let mut rows = self.lock();
        let id = row_key(key, group);
        if rows.contains_key(&id) {
            return Err(StorageError::Conflict {
                key: key.to_string(),
                group: group.to_string(),
            });
        }
        rows.insert(id, SettingRecord::new(key, group, value, setting_type));
        Ok(())
    }

    async fn remove_by_group(&self, group: &str) -> StorageResult<()> {
        let mut rows = self.lock();
        let before = rows.len();
        rows.retain(|(g, _), _| g != group);
        debug!("Removed {} in-memory rows of group {}", before - rows.len(), group);
        Ok(())
    }

    async fn remove_by_key_group(&self, key: &str, group: &str) -> StorageResult<()> {
        self.lock().remove(&row_key(key, group));
        Ok(())
    }

    async fn optimize(&self) -> StorageResult<()> {
        Ok(())
    }
}
