use motioner_cli::history::QueryHistory;
use tempfile::tempdir;

#[test]
fn records_and_reloads_entries() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("history.json");

    {
        let mut history = QueryHistory::with_file(file.clone()).unwrap();
        history
            .record("mer pengar till .*", "/motioner", true, Some(12))
            .unwrap();
        history
            .record("asdf", "/motioner/timeline/search", false, Some(4))
            .unwrap();
        assert_eq!(history.len(), 2);
    }

    let reloaded = QueryHistory::with_file(file).unwrap();
    assert_eq!(reloaded.len(), 2);

    let recent = reloaded.recent(10);
    assert_eq!(recent[0].phrase, "asdf");
    assert!(!recent[0].success);
    assert_eq!(recent[1].phrase, "mer pengar till .*");
    assert_eq!(recent[1].duration_ms, Some(12));
}

#[test]
fn consecutive_duplicates_collapse() {
    let dir = tempdir().unwrap();
    let mut history = QueryHistory::with_file(dir.path().join("history.json")).unwrap();

    history.record("asdf", "/motioner", true, None).unwrap();
    history.record("asdf", "/motioner", true, None).unwrap();
    assert_eq!(history.len(), 1);

    // Same phrase against a different endpoint is a distinct query
    history
        .record("asdf", "/motioner/hits", true, None)
        .unwrap();
    assert_eq!(history.len(), 2);
}

#[test]
fn empty_phrases_are_not_recorded() {
    let dir = tempdir().unwrap();
    let mut history = QueryHistory::with_file(dir.path().join("history.json")).unwrap();

    history.record("   ", "/motioner", true, None).unwrap();
    assert!(history.is_empty());
}

#[test]
fn top_orders_by_execution_count() {
    let dir = tempdir().unwrap();
    let mut history = QueryHistory::with_file(dir.path().join("history.json")).unwrap();

    history.record("a", "/motioner", true, None).unwrap();
    history.record("b", "/motioner", true, None).unwrap();
    history.record("a", "/motioner", true, None).unwrap();
    history.record("c", "/motioner", true, None).unwrap();
    history.record("a", "/motioner", true, None).unwrap();

    let top = history.top(2);
    assert_eq!(top[0], ("a".to_string(), 3));
    assert_eq!(top[1].1, 1);
}

#[test]
fn configured_cap_evicts_oldest_entries() {
    let dir = tempdir().unwrap();
    let mut history = QueryHistory::with_file_and_cap(dir.path().join("history.json"), 2).unwrap();

    for phrase in ["a", "b", "a", "c", "d"] {
        history.record(phrase, "/motioner", true, None).unwrap();
    }

    assert_eq!(history.len(), 2);
    let recent = history.recent(10);
    assert_eq!(recent[0].phrase, "d");
    assert_eq!(recent[1].phrase, "c");

    // Evicted entries no longer contribute to the frequency view
    let top = history.top(10);
    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|(_, count)| *count == 1));
}

#[test]
fn fuzzy_search_finds_past_phrases() {
    let dir = tempdir().unwrap();
    let mut history = QueryHistory::with_file(dir.path().join("history.json")).unwrap();

    history
        .record("mer pengar till .*", "/motioner", true, None)
        .unwrap();
    history
        .record("parti:(m,s) år:(1995-2000)", "/motioner", true, None)
        .unwrap();

    let matches = history.search("pengar");
    assert!(!matches.is_empty());
    assert_eq!(matches[0].entry.phrase, "mer pengar till .*");
    assert!(!matches[0].indices.is_empty());

    // Empty query falls back to recent entries
    assert_eq!(history.search("").len(), 2);
}

#[test]
fn clear_persists() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("history.json");

    let mut history = QueryHistory::with_file(file.clone()).unwrap();
    history.record("asdf", "/motioner", true, None).unwrap();
    history.clear().unwrap();
    assert!(history.is_empty());

    let reloaded = QueryHistory::with_file(file).unwrap();
    assert!(reloaded.is_empty());
}
