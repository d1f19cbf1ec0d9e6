// ABOUTME: Type definitions for persisted settings rows
// ABOUTME: The four supported value kinds and the raw (key, group, value, type) row

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::StorageError;

/// Kind of value a setting holds. Stored as a lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Integer,
    String,
    Boolean,
    Double,
}

impl SettingType {
    pub const ALL: [SettingType; 4] = [
        SettingType::Integer,
        SettingType::String,
        SettingType::Boolean,
        SettingType::Double,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Integer => "integer",
            SettingType::String => "string",
            SettingType::Boolean => "boolean",
            SettingType::Double => "double",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "integer" => Ok(SettingType::Integer),
            "string" => Ok(SettingType::String),
            "boolean" => Ok(SettingType::Boolean),
            "double" => Ok(SettingType::Double),
            _ => Err(StorageError::UnsupportedType(s.to_string())),
        }
    }
}

/// One persisted settings row.
///
/// `setting_type` keeps the raw tag read from storage so rows written by
/// other tools with an unknown tag can still be inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SettingRecord {
    pub key: String,
    pub group: String,
    pub value: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub setting_type: String,
}

impl SettingRecord {
    pub fn new(
        key: impl Into<String>,
        group: impl Into<String>,
        value: impl Into<String>,
        setting_type: SettingType,
    ) -> Self {
        Self {
            key: key.into(),
            group: group.into(),
            value: value.into(),
            setting_type: setting_type.as_str().to_string(),
        }
    }

    /// Parsed type tag, `UnsupportedType` for unknown tags
    pub fn kind(&self) -> Result<SettingType, StorageError> {
        self.setting_type.parse()
    }
}
