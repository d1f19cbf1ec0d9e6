// ABOUTME: Error types and fail-mode handling for the settings store
// ABOUTME: Strict mode returns errors, lenient mode reports them as an Outcome

use setstore_storage::StorageError;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Setting not found: {key} in group {group}")]
    NotFound { key: String, group: String },

    #[error("Setting already exists: {key} in group {group}")]
    Conflict { key: String, group: String },

    #[error("Unsupported setting type: {0}")]
    UnsupportedType(String),

    #[error("Storage backend failure: {0}")]
    Backend(StorageError),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

impl From<StorageError> for SettingsError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { key, group } => SettingsError::NotFound { key, group },
            StorageError::Conflict { key, group } => SettingsError::Conflict { key, group },
            StorageError::UnsupportedType(tag) => SettingsError::UnsupportedType(tag),
            other => SettingsError::Backend(other),
        }
    }
}

impl SettingsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SettingsError::NotFound { .. } => ErrorKind::NotFound,
            SettingsError::Conflict { .. } => ErrorKind::Conflict,
            SettingsError::UnsupportedType(_) => ErrorKind::UnsupportedType,
            SettingsError::Backend(_) => ErrorKind::BackendFailure,
        }
    }
}

/// Error detail that survives lenient mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    UnsupportedType,
    BackendFailure,
}

/// How an operation reports failure.
///
/// `Strict` returns the error to the caller. `Lenient` logs it and yields
/// [`Outcome::Absent`] carrying only the [`ErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailMode {
    #[default]
    Strict,
    Lenient,
}

impl FailMode {
    pub(crate) fn wrap<T>(
        self,
        operation: &str,
        result: SettingsResult<T>,
    ) -> SettingsResult<Outcome<T>> {
        match result {
            Ok(value) => Ok(Outcome::Value(value)),
            Err(err) => match self {
                FailMode::Strict => Err(err),
                FailMode::Lenient => {
                    warn!("Suppressed {} failure: {}", operation, err);
                    Ok(Outcome::Absent(err.kind()))
                }
            },
        }
    }
}

/// Result of a store operation that did not return an error.
///
/// Kept separate from the value channel so a lenient failure can never be
/// mistaken for a stored `false`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Value(T),
    Absent(ErrorKind),
}

impl<T> Outcome<T> {
    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Outcome::Absent(_))
    }

    pub fn value(self) -> Option<T> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Absent(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Absent(_) => None,
        }
    }

    pub fn failure(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Absent(kind) => Some(*kind),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Value(value) => Outcome::Value(f(value)),
            Outcome::Absent(kind) => Outcome::Absent(kind),
        }
    }
}
