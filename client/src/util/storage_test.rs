use super::*;

fn temp_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("client-storage-{}", uuid::Uuid::new_v4()))
        .join("session.json")
}

// =============================================================
// MemoryTokenStore
// =============================================================

#[test]
fn memory_store_starts_empty() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn memory_store_set_get_remove() {
    let store = MemoryTokenStore::new();
    store.set(TOKEN_KEY, "abc").unwrap();
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    store.set(TOKEN_KEY, "def").unwrap();
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("def"));
    store.remove(TOKEN_KEY).unwrap();
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn memory_store_remove_missing_is_ok() {
    let store = MemoryTokenStore::new();
    assert!(store.remove("nope").is_ok());
}

// =============================================================
// FileTokenStore
// =============================================================

#[test]
fn file_store_missing_file_reads_empty() {
    let store = FileTokenStore::new(temp_path());
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert!(!store.path().exists());
}

#[test]
fn file_store_persists_across_instances() {
    let path = temp_path();
    FileTokenStore::new(&path).set(TOKEN_KEY, "abc").unwrap();

    let reopened = FileTokenStore::new(&path);
    assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn file_store_keeps_other_keys() {
    let path = temp_path();
    let store = FileTokenStore::new(&path);
    store.set("theme", "dark").unwrap();
    store.set(TOKEN_KEY, "abc").unwrap();
    store.remove(TOKEN_KEY).unwrap();

    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, serde_json::json!({ "theme": "dark" }));

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn file_store_remove_missing_does_not_create_file() {
    let store = FileTokenStore::new(temp_path());
    store.remove(TOKEN_KEY).unwrap();
    assert!(!store.path().exists());
}

#[test]
fn file_store_rejects_corrupt_file() {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json").unwrap();

    let store = FileTokenStore::new(&path);
    assert!(matches!(store.get(TOKEN_KEY), Err(StorageError::Format(_))));

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn file_store_blank_file_reads_empty() {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "  \n").unwrap();

    let store = FileTokenStore::new(&path);
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}
