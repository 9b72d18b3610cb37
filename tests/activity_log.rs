// tests/activity_log.rs

use autopilot::activity::ActivityLog;
use autopilot::types::LogKind;

#[test]
fn entries_keep_order_and_ids() {
    let log = ActivityLog::new();
    assert!(log.is_empty());

    let first = log.add("fetching subreddit posts", LogKind::Info);
    let second = log.add("generating comment", LogKind::Generating);
    let third = log.add("comment posted", LogKind::Success);

    assert!(first < second && second < third);
    let entries = log.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].message, "generating comment");
    assert_eq!(entries[1].kind, LogKind::Generating);
    assert!(entries[0].timestamp <= entries[2].timestamp);
}

#[test]
fn clear_empties_log_but_ids_keep_growing() {
    let log = ActivityLog::new();
    let before = log.add("one", LogKind::Info);
    log.add("two", LogKind::Error);

    log.clear();
    assert_eq!(log.len(), 0);

    let after = log.add("three", LogKind::Info);
    assert!(after > before + 1);
    assert_eq!(log.len(), 1);
}

#[test]
fn clones_append_to_the_same_log() {
    let log = ActivityLog::new();
    let writer = log.clone();

    writer.add("from a clone", LogKind::Success);

    assert_eq!(log.len(), 1);
}

#[test]
fn kinds_render_lowercase() {
    assert_eq!(LogKind::Generating.to_string(), "generating");
    assert_eq!(format!("{:<8}|", LogKind::Info), "info    |");
}
