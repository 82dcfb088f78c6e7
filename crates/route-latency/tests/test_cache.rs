mod common;

use common::{analyzed, analyzed_map};
use route_latency::{cache::CacheManager, record::AnalyzedRecords};
use tempfile::TempDir;

#[test]
fn test_cache_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    let cache = CacheManager::new();

    let mut odd = analyzed("AVfb3", "/search", "0.5");
    odd.message.insert("q".to_string(), "caf\u{e9} \"quoted\"".to_string());
    odd.message.insert(String::new(), "=".to_string());
    let records = analyzed_map(vec![
        analyzed("AVfb1", "/users", "12.5"),
        analyzed("AVfb2", "/orders", "1500"),
        odd,
    ]);

    assert!(!cache.exists(&path));
    cache.save(&records, &path).unwrap();
    assert!(cache.exists(&path));

    let loaded = cache.load(&path).unwrap();
    assert_eq!(loaded, records);
    // Field and record order survive too
    assert_eq!(
        loaded.keys().collect::<Vec<_>>(),
        records.keys().collect::<Vec<_>>()
    );
}

#[test]
fn test_cache_creates_parent_dirs() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("cache").join("data.json");
    let cache = CacheManager::new();

    cache
        .save(&analyzed_map(vec![analyzed("1", "/a", "1")]), &path)
        .unwrap();

    assert_eq!(cache.load(&path).unwrap().len(), 1);
}

#[test]
fn test_cache_reads_reference_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    std::fs::write(
        &path,
        r#"{"AVfb1": {"_id": "AVfb1", "message": {"method": "GET", "path": "/users", "duration": "12.5"}, "_timestamp": "2016-10-19T10:00:00.000Z", "_host": "ci-1"}}"#,
    )
    .unwrap();

    let loaded: AnalyzedRecords = CacheManager::new().load(&path).unwrap();

    let record = &loaded["AVfb1"];
    assert_eq!(record.path().unwrap(), "/users");
    assert_eq!(record.duration_ms().unwrap(), 12.5);
    assert_eq!(record.host, "ci-1");
}

#[test]
fn test_corrupt_cache_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    std::fs::write(&path, r#"{"AVfb1": {"_id": "AVfb1", "mess"#).unwrap();

    let err = CacheManager::new().load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("corrupt"));
}

#[test]
fn test_missing_cache_fails() {
    let temp_dir = TempDir::new().unwrap();
    assert!(
        CacheManager::new()
            .load(&temp_dir.path().join("absent.json"))
            .is_err()
    );
}
