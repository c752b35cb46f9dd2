use super::*;

// =============================================================
// FileTokenStorage
// =============================================================

#[test]
fn file_storage_missing_file_loads_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileTokenStorage::new(dir.path().join("token"));
    assert_eq!(storage.load().unwrap(), None);
}

#[test]
fn file_storage_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileTokenStorage::new(dir.path().join("nested").join("token"));
    storage.save("abc123").unwrap();
    assert_eq!(storage.load().unwrap().as_deref(), Some("abc123"));
}

#[test]
fn file_storage_trims_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    std::fs::write(&path, "abc123\n").unwrap();
    let storage = FileTokenStorage::new(&path);
    assert_eq!(storage.load().unwrap().as_deref(), Some("abc123"));
}

#[test]
fn file_storage_empty_file_loads_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    std::fs::write(&path, "").unwrap();
    assert_eq!(FileTokenStorage::new(&path).load().unwrap(), None);
}

#[test]
fn file_storage_remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileTokenStorage::new(dir.path().join("token"));
    storage.save("abc").unwrap();
    storage.remove().unwrap();
    storage.remove().unwrap();
    assert_eq!(storage.load().unwrap(), None);
    assert!(!storage.path().exists());
}

#[test]
fn file_storage_unreadable_path_errors() {
    let dir = tempfile::tempdir().unwrap();
    // A directory at the token path cannot be read as a file.
    let storage = FileTokenStorage::new(dir.path());
    assert!(matches!(storage.load(), Err(StorageError::Io { .. })));
}

// =============================================================
// MemoryTokenStorage
// =============================================================

#[test]
fn memory_storage_starts_empty() {
    assert_eq!(MemoryTokenStorage::new().load().unwrap(), None);
}

#[test]
fn memory_storage_seeded_token() {
    let storage = MemoryTokenStorage::with_token("T1");
    assert_eq!(storage.load().unwrap().as_deref(), Some("T1"));
}

#[test]
fn memory_storage_save_and_remove() {
    let storage = MemoryTokenStorage::new();
    storage.save("X").unwrap();
    assert_eq!(storage.load().unwrap().as_deref(), Some("X"));
    storage.remove().unwrap();
    assert_eq!(storage.load().unwrap(), None);
}

#[test]
fn memory_storage_empty_save_reads_absent() {
    let storage = MemoryTokenStorage::new();
    storage.save("").unwrap();
    assert_eq!(storage.load().unwrap(), None);
}
