// ABOUTME: Typed settings store over a row-level persistence backend
// ABOUTME: Single-entry and group-wide get/set/create/remove with fail-mode handling

use setstore_core::StoreConfig;
use setstore_storage::{SettingRecord, SettingType, SettingsBackend, SqliteBackend};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::cast::{cast, cast_to};
use crate::error::{FailMode, Outcome, SettingsError, SettingsResult};
use crate::value::SettingValue;

/// Input for creating a setting. `value` is stored as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSetting {
    pub key: String,
    pub value: String,
    pub setting_type: SettingType,
    pub group: String,
}

impl NewSetting {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        setting_type: SettingType,
        group: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            setting_type,
            group: group.into(),
        }
    }
}

/// Typed access to settings persisted by a [`SettingsBackend`].
///
/// Nothing is cached; every call round-trips to the backend.
pub struct SettingsStore<B> {
    backend: B,
}

impl SettingsStore<SqliteBackend> {
    /// Open the SQLite database and table described by `config`
    pub async fn open(config: &StoreConfig) -> SettingsResult<Self> {
        let backend = SqliteBackend::connect(config).await?;
        Ok(Self::new(backend))
    }

    pub fn table(&self) -> &str {
        self.backend.table_name()
    }
}

impl<B: SettingsBackend> SettingsStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get a setting cast to its stored type.
    ///
    /// A row with an unsupported type tag fails with `UnsupportedType` even in
    /// lenient mode.
    pub async fn get(
        &self,
        key: &str,
        group: &str,
        mode: FailMode,
    ) -> SettingsResult<Outcome<SettingValue>> {
        let record = match mode.wrap("get", self.fetch(key, group).await)? {
            Outcome::Value(record) => record,
            Outcome::Absent(kind) => return Ok(Outcome::Absent(kind)),
        };

        Ok(Outcome::Value(cast(record.value, &record.setting_type)?))
    }

    /// Update the value of an existing setting. The stored type is unchanged.
    pub async fn set(
        &self,
        key: &str,
        value: impl Into<SettingValue>,
        group: &str,
        mode: FailMode,
    ) -> SettingsResult<Outcome<()>> {
        let result = self.update(key, &value.into(), group).await;
        mode.wrap("set", result)
    }

    /// All settings of a group keyed by setting key. Unknown groups are empty.
    pub async fn get_all_group(
        &self,
        group: &str,
        mode: FailMode,
    ) -> SettingsResult<Outcome<BTreeMap<String, SettingValue>>> {
        let result = self.fetch_group(group).await;
        mode.wrap("get_all_group", result)
    }

    /// Set each entry in iteration order.
    ///
    /// Not transactional: entries written before a failure stay written.
    pub async fn set_all_group<I, K, V>(
        &self,
        entries: I,
        group: &str,
        mode: FailMode,
    ) -> SettingsResult<Outcome<()>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<SettingValue>,
    {
        let result = self.update_each(entries, group).await;
        mode.wrap("set_all_group", result)
    }

    /// Create a setting. The value is not checked against `setting_type` until read.
    pub async fn new_setting(
        &self,
        key: &str,
        value: &str,
        setting_type: SettingType,
        group: &str,
        mode: FailMode,
    ) -> SettingsResult<Outcome<()>> {
        let result = self.insert(key, value, setting_type, group).await;
        mode.wrap("new_setting", result)
    }

    /// Create settings in order. Not transactional, like [`Self::set_all_group`].
    pub async fn new_settings<I>(&self, entries: I, mode: FailMode) -> SettingsResult<Outcome<()>>
    where
        I: IntoIterator<Item = NewSetting>,
    {
        let result = self.insert_each(entries).await;
        mode.wrap("new_settings", result)
    }

    /// Whether (key, group) exists. Backend errors are always returned.
    pub async fn has_setting(&self, key: &str, group: &str) -> SettingsResult<bool> {
        Ok(self.backend.get_by_key_group(key, group).await?.is_some())
    }

    /// Raw stored row, without casting
    pub async fn get_record(&self, key: &str, group: &str) -> SettingsResult<Option<SettingRecord>> {
        Ok(self.backend.get_by_key_group(key, group).await?)
    }

    /// Delete every setting of a group, then compact storage
    pub async fn remove_group(&self, group: &str, mode: FailMode) -> SettingsResult<Outcome<()>> {
        let result = self.delete_group(group).await;
        mode.wrap("remove_group", result)
    }

    /// Delete one setting, then compact storage
    pub async fn remove_setting(
        &self,
        key: &str,
        group: &str,
        mode: FailMode,
    ) -> SettingsResult<Outcome<()>> {
        let result = self.delete_setting(key, group).await;
        mode.wrap("remove_setting", result)
    }

    async fn fetch(&self, key: &str, group: &str) -> SettingsResult<SettingRecord> {
        self.backend
            .get_by_key_group(key, group)
            .await?
            .ok_or_else(|| SettingsError::NotFound {
                key: key.to_string(),
                group: group.to_string(),
            })
    }

    async fn fetch_group(&self, group: &str) -> SettingsResult<BTreeMap<String, SettingValue>> {
        let records = self.backend.get_all_group(group).await?;
        debug!("Loaded {} settings for group {}", records.len(), group);

        records
            .into_iter()
            .map(|record| -> SettingsResult<(String, SettingValue)> {
                let value = cast(record.value, &record.setting_type)?;
                Ok((record.key, value))
            })
            .collect()
    }

    async fn update(&self, key: &str, value: &SettingValue, group: &str) -> SettingsResult<()> {
        let serialized = cast_to(value, SettingType::String).to_string();
        self.backend
            .set_by_key_group(key, &serialized, group)
            .await?;
        Ok(())
    }

    async fn update_each<I, K, V>(&self, entries: I, group: &str) -> SettingsResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<SettingValue>,
    {
        for (key, value) in entries {
            self.update(key.as_ref(), &value.into(), group).await?;
        }
        Ok(())
    }

    async fn insert(
        &self,
        key: &str,
        value: &str,
        setting_type: SettingType,
        group: &str,
    ) -> SettingsResult<()> {
        self.backend
            .new_setting(key, value, setting_type, group)
            .await?;
        Ok(())
    }

    async fn insert_each<I>(&self, entries: I) -> SettingsResult<()>
    where
        I: IntoIterator<Item = NewSetting>,
    {
        for entry in entries {
            self.insert(&entry.key, &entry.value, entry.setting_type, &entry.group)
                .await?;
        }
        Ok(())
    }

    async fn delete_group(&self, group: &str) -> SettingsResult<()> {
        self.backend.remove_by_group(group).await?;
        self.backend.optimize().await?;
        info!("Removed settings group {}", group);
        Ok(())
    }

    async fn delete_setting(&self, key: &str, group: &str) -> SettingsResult<()> {
        self.backend.remove_by_key_group(key, group).await?;
        self.backend.optimize().await?;
        debug!("Removed setting {}/{}", group, key);
        Ok(())
    }
}
