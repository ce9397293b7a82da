//! Durability tests for the history log
//!
//! The log is the only state that survives a restart: these tests reopen
//! the same file with a fresh store and verify readers tolerate whatever
//! a torn concurrent append may have left behind.

use std::io::Write;

use telemetry_hub::storage::HistoryStore;
use tempfile::tempdir;

use super::helpers::*;

#[tokio::test]
async fn records_survive_store_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.csv");

    {
        let store = HistoryStore::new(&path);
        store.append(&test_reading("Agent-1", 10.0)).await.unwrap();
        store.append(&critical_reading("Agent-1", 95.0)).await.unwrap();
    }

    let reopened = HistoryStore::new(&path);
    let records = reopened.query(Some("Agent-1"), 10).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].status, "CRITIQUE");

    let summary = reopened.statistics_for(Some("Agent-1")).await.unwrap();
    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.critical_count, 1);
}

#[tokio::test]
async fn torn_final_line_is_discarded_by_readers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.csv");

    let store = HistoryStore::new(&path);
    store.append(&test_reading("Agent-1", 10.0)).await.unwrap();
    store.append(&test_reading("Agent-1", 20.0)).await.unwrap();

    // Simulate a reader racing a writer mid-append: an unterminated,
    // half-written record at the end of the file.
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .unwrap();
    file.write_all(b"2026-08-30 12:00:00,Agent-1,57.").unwrap();
    drop(file);

    let records = store.query(None, 10).await.unwrap();
    let cpus: Vec<f64> = records.iter().map(|r| r.cpu_percent).collect();

    assert_eq!(cpus, vec![10.0, 20.0]);
}

#[tokio::test]
async fn foreign_agent_lines_are_kept_separate() {
    let dir = tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join("history.csv"));

    store.append(&test_reading("Agent-1", 10.0)).await.unwrap();
    store.append(&test_reading("Agent-2", 90.0)).await.unwrap();
    store.append(&test_reading("Agent-1", 30.0)).await.unwrap();

    let agent_1 = store.query(Some("Agent-1"), 10).await.unwrap();
    assert_eq!(agent_1.len(), 2);

    // Absent and empty filters both mean "all agents"
    assert_eq!(store.query(None, 10).await.unwrap().len(), 3);
    assert_eq!(store.query(Some(""), 10).await.unwrap().len(), 3);
}

#[tokio::test]
async fn append_order_is_the_total_order() {
    let dir = tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join("history.csv"));

    // Out-of-order timestamps are appended as-is, never re-sorted
    let mut late = test_reading("Agent-1", 10.0);
    late.timestamp = chrono::Utc::now() - chrono::Duration::minutes(5);
    let early = test_reading("Agent-1", 20.0);

    store.append(&early).await.unwrap();
    store.append(&late).await.unwrap();

    let records = store.query(None, 10).await.unwrap();
    assert_eq!(records[0].cpu_percent, 20.0);
    assert_eq!(records[1].cpu_percent, 10.0);
}
