// ABOUTME: Typed, grouped key/value settings store
// ABOUTME: Casts canonical stored strings to integers, strings, booleans and doubles

//! Settings are rows of `(key, group, value, type)`. Values are always stored
//! as strings and cast on read according to their recorded type.
//!
//! ```no_run
//! use setstore_settings::{FailMode, SettingType, SettingsStore};
//! use setstore_core::StoreConfig;
//!
//! # async fn run() -> Result<(), setstore_settings::SettingsError> {
//! let store = SettingsStore::open(&StoreConfig::from_env()).await?;
//! store
//!     .new_setting("port", "8080", SettingType::Integer, "server", FailMode::Strict)
//!     .await?;
//! if let Some(port) = store.get("port", "server", FailMode::Strict).await?.value() {
//!     println!("listening on {}", port);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cast;
pub mod error;
pub mod store;
pub mod value;

pub use cast::{bool_to_string, cast, cast_str, cast_to};
pub use error::{ErrorKind, FailMode, Outcome, SettingsError, SettingsResult};
pub use store::{NewSetting, SettingsStore};
pub use value::SettingValue;

// Re-export storage types used in the store API
pub use setstore_storage::{
    MemoryBackend, SettingRecord, SettingType, SettingsBackend, SqliteBackend, StorageError,
};
