use motioner_cli::cache::ResponseCache;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let mut cache = ResponseCache::with_dir(dir.path().to_path_buf()).unwrap();

    let body = json!([
        {"titel": "Motion 1995/96:A1", "parti": "s"},
        {"titel": "Motion 1995/96:A2", "parti": "m"}
    ]);
    let id = cache.save("/motioner", "asdf", &body).unwrap();

    let (entry, loaded) = cache.load(id).unwrap();
    assert_eq!(entry.endpoint, "/motioner");
    assert_eq!(entry.phrase, "asdf");
    assert_eq!(entry.row_count, 2);
    assert_eq!(loaded, body);
}

#[test]
fn duplicate_key_reuses_the_entry() {
    let dir = tempdir().unwrap();
    let mut cache = ResponseCache::with_dir(dir.path().to_path_buf()).unwrap();

    let first = cache.save("/motioner", "asdf", &json!([1])).unwrap();
    let second = cache.save("/motioner", "asdf", &json!([1, 2])).unwrap();
    assert_eq!(first, second);
    assert_eq!(cache.list().len(), 1);

    // Same phrase on another endpoint is a different key
    let third = cache
        .save("/motioner/timeline/search", "asdf", &json!([1]))
        .unwrap();
    assert_ne!(first, third);
}

#[test]
fn non_array_bodies_count_as_one_row() {
    let dir = tempdir().unwrap();
    let mut cache = ResponseCache::with_dir(dir.path().to_path_buf()).unwrap();

    let id = cache
        .save("/motioner/timeline/total", "", &json!({"1995": 120, "1996": 98}))
        .unwrap();
    let (entry, _) = cache.load(id).unwrap();
    assert_eq!(entry.row_count, 1);
}

#[test]
fn delete_and_clear() {
    let dir = tempdir().unwrap();
    let mut cache = ResponseCache::with_dir(dir.path().to_path_buf()).unwrap();

    let id = cache.save("/motioner", "a", &json!([])).unwrap();
    cache.save("/motioner", "b", &json!([])).unwrap();

    cache.delete(id).unwrap();
    assert_eq!(cache.list().len(), 1);
    assert!(cache.load(id).is_err());

    cache.clear().unwrap();
    assert!(cache.list().is_empty());

    // Metadata survives a reopen
    let reopened = ResponseCache::with_dir(dir.path().to_path_buf()).unwrap();
    assert!(reopened.list().is_empty());
}

#[test]
fn stats_report_sizes() {
    let dir = tempdir().unwrap();
    let mut cache = ResponseCache::with_dir(dir.path().to_path_buf()).unwrap();

    cache.save("/motioner", "asdf", &json!([{"a": 1}])).unwrap();
    let stats = cache.stats();

    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.total_rows, 1);
    assert!(stats.total_size_bytes > 0);
    assert!(stats.format_size().ends_with(" B"));
    assert!(stats.oldest_entry.is_some());
}
