// ABOUTME: Tests for backend failures surfacing through the settings store
// ABOUTME: Uses a mocked backend to check fail-mode wrapping and compaction calls

use async_trait::async_trait;
use mockall::{mock, predicate::eq};
use setstore_settings::{
    ErrorKind, FailMode, Outcome, SettingRecord, SettingType, SettingsBackend, SettingsError,
    SettingsStore, StorageError,
};
use setstore_storage::StorageResult;

mock! {
    pub Backend {}

    #[async_trait]
    impl SettingsBackend for Backend {
        async fn get_by_key_group(&self, key: &str, group: &str) -> StorageResult<Option<SettingRecord>>;
        async fn set_by_key_group(&self, key: &str, value: &str, group: &str) -> StorageResult<()>;
        async fn get_all_group(&self, group: &str) -> StorageResult<Vec<SettingRecord>>;
        async fn new_setting(
            &self,
            key: &str,
            value: &str,
            setting_type: SettingType,
            group: &str,
        ) -> StorageResult<()>;
        async fn remove_by_group(&self, group: &str) -> StorageResult<()>;
        async fn remove_by_key_group(&self, key: &str, group: &str) -> StorageResult<()>;
        async fn optimize(&self) -> StorageResult<()>;
    }
}

fn disk_error() -> StorageError {
    StorageError::Database("disk I/O error".to_string())
}

#[tokio::test]
async fn test_get_backend_failure_strict() {
    let mut backend = MockBackend::new();
    backend
        .expect_get_by_key_group()
        .returning(|_, _| Err(disk_error()));

    let store = SettingsStore::new(backend);
    let result = store.get("k", "g", FailMode::Strict).await;

    match result {
        Err(SettingsError::Backend(StorageError::Database(msg))) => {
            assert!(msg.contains("disk"));
        }
        other => panic!("Expected Backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_backend_failure_lenient() {
    let mut backend = MockBackend::new();
    backend
        .expect_get_by_key_group()
        .returning(|_, _| Err(disk_error()));

    let store = SettingsStore::new(backend);
    let outcome = store.get("k", "g", FailMode::Lenient).await.unwrap();
    assert_eq!(outcome, Outcome::Absent(ErrorKind::BackendFailure));
}

#[tokio::test]
async fn test_has_setting_propagates_backend_errors() {
    let mut backend = MockBackend::new();
    backend
        .expect_get_by_key_group()
        .returning(|_, _| Err(disk_error()));

    let store = SettingsStore::new(backend);
    let result = store.has_setting("k", "g").await;
    assert!(matches!(result, Err(SettingsError::Backend(_))));
}

#[tokio::test]
async fn test_get_all_group_backend_failure() {
    let mut backend = MockBackend::new();
    backend
        .expect_get_all_group()
        .times(2)
        .returning(|_| Err(disk_error()));

    let store = SettingsStore::new(backend);

    let strict = store.get_all_group("g", FailMode::Strict).await;
    assert!(matches!(strict, Err(SettingsError::Backend(_))));

    let lenient = store.get_all_group("g", FailMode::Lenient).await.unwrap();
    assert_eq!(lenient, Outcome::Absent(ErrorKind::BackendFailure));
}

#[tokio::test]
async fn test_get_all_group_lenient_swallows_unsupported_rows() {
    let mut backend = MockBackend::new();
    backend.expect_get_all_group().returning(|group| {
        Ok(vec![
            SettingRecord::new("ok", group, "1", SettingType::Integer),
            SettingRecord {
                key: "bad".to_string(),
                group: group.to_string(),
                value: "[1,2]".to_string(),
                setting_type: "array".to_string(),
            },
        ])
    });

    let store = SettingsStore::new(backend);

    let strict = store.get_all_group("g", FailMode::Strict).await;
    assert!(matches!(strict, Err(SettingsError::UnsupportedType(_))));

    let lenient = store.get_all_group("g", FailMode::Lenient).await.unwrap();
    assert_eq!(lenient, Outcome::Absent(ErrorKind::UnsupportedType));
}

#[tokio::test]
async fn test_set_serializes_before_calling_backend() {
    let mut backend = MockBackend::new();
    backend
        .expect_set_by_key_group()
        .with(eq("enabled"), eq("true"), eq("features"))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let store = SettingsStore::new(backend);
    let outcome = store
        .set("enabled", true, "features", FailMode::Strict)
        .await
        .unwrap();
    assert!(outcome.is_value());
}

#[tokio::test]
async fn test_set_all_group_stops_at_first_failure() {
    let mut backend = MockBackend::new();
    backend
        .expect_set_by_key_group()
        .with(eq("a"), eq("1"), eq("g"))
        .times(1)
        .returning(|_, _, _| Ok(()));
    backend
        .expect_set_by_key_group()
        .with(eq("b"), eq("2"), eq("g"))
        .times(1)
        .returning(|_, _, _| Err(disk_error()));
    // "c" is never written
    backend
        .expect_set_by_key_group()
        .with(eq("c"), eq("3"), eq("g"))
        .never();

    let store = SettingsStore::new(backend);
    let outcome = store
        .set_all_group(vec![("a", 1), ("b", 2), ("c", 3)], "g", FailMode::Lenient)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Absent(ErrorKind::BackendFailure));
}

#[tokio::test]
async fn test_remove_group_runs_optimize() {
    let mut backend = MockBackend::new();
    backend
        .expect_remove_by_group()
        .with(eq("cache"))
        .times(1)
        .returning(|_| Ok(()));
    backend.expect_optimize().times(1).returning(|| Ok(()));

    let store = SettingsStore::new(backend);
    let outcome = store.remove_group("cache", FailMode::Strict).await.unwrap();
    assert!(outcome.is_value());
}

#[tokio::test]
async fn test_remove_setting_runs_optimize() {
    let mut backend = MockBackend::new();
    backend
        .expect_remove_by_key_group()
        .with(eq("token"), eq("auth"))
        .times(1)
        .returning(|_, _| Ok(()));
    backend.expect_optimize().times(1).returning(|| Ok(()));

    let store = SettingsStore::new(backend);
    let outcome = store
        .remove_setting("token", "auth", FailMode::Strict)
        .await
        .unwrap();
    assert!(outcome.is_value());
}

#[tokio::test]
async fn test_remove_skips_optimize_when_delete_fails() {
    let mut backend = MockBackend::new();
    backend
        .expect_remove_by_group()
        .returning(|_| Err(disk_error()));
    backend.expect_optimize().never();

    let store = SettingsStore::new(backend);

    let lenient = store.remove_group("cache", FailMode::Lenient).await.unwrap();
    assert_eq!(lenient, Outcome::Absent(ErrorKind::BackendFailure));

    let strict = store.remove_group("cache", FailMode::Strict).await;
    assert!(matches!(strict, Err(SettingsError::Backend(_))));
}

#[tokio::test]
async fn test_optimize_failure_is_reported() {
    let mut backend = MockBackend::new();
    backend
        .expect_remove_by_key_group()
        .returning(|_, _| Ok(()));
    backend.expect_optimize().returning(|| Err(disk_error()));

    let store = SettingsStore::new(backend);
    let outcome = store
        .remove_setting("token", "auth", FailMode::Lenient)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Absent(ErrorKind::BackendFailure));
}
