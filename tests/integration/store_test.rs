//! Disk round-trip tests for the verified-query store.

use sql_vouch::store::{QueryStore, VerifiedQuery};
use tempfile::TempDir;

fn record(name: &str, sql: &str) -> VerifiedQuery {
    VerifiedQuery::new(
        name,
        "how many orders were delivered last quarter",
        "Counts delivered orders over the last quarter.",
        sql,
        "rivera",
    )
}

#[test]
fn test_all_fields_survive_a_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("verified_queries.yaml");

    let original = record("delivered_q", "SELECT COUNT(*) FROM orders WHERE delivered = true");
    let mut store = QueryStore::load(&path);
    store.append(original.clone()).unwrap();

    let reopened = QueryStore::load(&path);
    assert_eq!(reopened.queries(), &[original]);
}

#[test]
fn test_multiline_sql_survives_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("verified_queries.yaml");

    let sql = "SELECT order_id, city\nFROM orders\nWHERE city = 'Portland'\n  AND year = 2026";
    let mut store = QueryStore::load(&path);
    store.append(record("portland", sql)).unwrap();

    let reopened = QueryStore::load(&path);
    assert_eq!(reopened.queries()[0].sql, sql);
}

#[test]
fn test_append_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("team").join("shared").join("queries.yaml");

    let mut store = QueryStore::load(&path);
    store.append(record("nested", "SELECT 1")).unwrap();

    assert!(path.exists());
    assert_eq!(QueryStore::load(&path).len(), 1);
}

#[test]
fn test_two_sessions_last_writer_wins() {
    // The store is single-writer: appending rewrites the whole file from the
    // writer's in-memory view, so a stale session clobbers a fresher one.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("verified_queries.yaml");

    let mut first = QueryStore::load(&path);
    let mut second = QueryStore::load(&path);

    first.append(record("from_first", "SELECT 1")).unwrap();
    second.append(record("from_second", "SELECT 2")).unwrap();

    let reopened = QueryStore::load(&path);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.queries()[0].name, "from_second");
}
