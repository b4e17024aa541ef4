//! End-to-end tests for the validator dashboard.
//!
//! The validator flow: ask a question, review and edit the generated SQL,
//! then /save it into the verified collection on disk.

use std::path::PathBuf;
use std::sync::Arc;

use sql_vouch::answer::MockAnswerClient;
use sql_vouch::app::{FeedItem, InputResult, Workbench};
use sql_vouch::catalog::MockCatalogClient;
use sql_vouch::cli::Dashboard;
use sql_vouch::oracle::{MockOracle, Oracle};
use sql_vouch::session::Session;
use sql_vouch::store::QueryStore;
use tempfile::TempDir;

const CANNED_SQL: &str = "SELECT order_id, city FROM orders WHERE region = 'west'";

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("verified_queries.yaml")
}

fn validator_workbench(
    dir: &TempDir,
    answer: Arc<MockAnswerClient>,
    catalog: Arc<MockCatalogClient>,
    oracle: Option<Arc<MockOracle>>,
) -> Workbench {
    Workbench::new(
        answer,
        catalog,
        oracle.map(|o| o as Arc<dyn Oracle>),
        QueryStore::load(store_path(dir)),
        Session::new("tester", Dashboard::Validator),
        100,
    )
}

async fn submit(wb: &mut Workbench, input: &str) -> Vec<FeedItem> {
    match wb.handle_input(input).await.unwrap() {
        InputResult::Items(items) => items,
        InputResult::Saved { items, .. } => items,
        other => panic!("Expected feed items, got {other:?}"),
    }
}

fn info_containing(items: &[FeedItem], needle: &str) -> bool {
    items
        .iter()
        .any(|i| matches!(i, FeedItem::Info(text) if text.contains(needle)))
}

fn error_containing(items: &[FeedItem], needle: &str) -> bool {
    items
        .iter()
        .any(|i| matches!(i, FeedItem::Error(text) if text.contains(needle)))
}

#[tokio::test]
async fn test_ask_then_save_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    let mut wb = validator_workbench(
        &dir,
        Arc::new(MockAnswerClient::canned()),
        Arc::new(MockCatalogClient::new()),
        None,
    );

    let items = submit(&mut wb, "show me west region orders").await;
    assert!(info_containing(&items, "/save"));
    assert_eq!(wb.session().current().unwrap().generated_sql, CANNED_SQL);

    let items = match wb.handle_input("/save west_orders").await.unwrap() {
        InputResult::Saved { items, name } => {
            assert_eq!(name, "west_orders");
            items
        }
        other => panic!("Expected a save confirmation, got {other:?}"),
    };
    assert!(info_containing(&items, "Saved \"west_orders\""));

    // A fresh load from disk sees the record with all fields filled in.
    let reopened = QueryStore::load(store_path(&dir));
    assert_eq!(reopened.len(), 1);
    let saved = &reopened.queries()[0];
    assert_eq!(saved.name, "west_orders");
    assert_eq!(saved.question, "show me west region orders");
    assert_eq!(saved.sql, CANNED_SQL);
    assert_eq!(saved.verified_by, "tester");
    assert!(!saved.query_explanation.is_empty());
    assert!(!saved.verified_at.is_empty());
}

#[tokio::test]
async fn test_save_writes_the_edited_sql_not_the_generated() {
    let dir = TempDir::new().unwrap();
    let mut wb = validator_workbench(
        &dir,
        Arc::new(MockAnswerClient::canned()),
        Arc::new(MockCatalogClient::new()),
        None,
    );

    submit(&mut wb, "show me west region orders").await;

    let edited = format!("{CANNED_SQL} ORDER BY city");
    assert!(wb.session_mut().set_edited_sql(&edited));

    submit(&mut wb, "/save west_orders_sorted").await;

    let reopened = QueryStore::load(store_path(&dir));
    assert_eq!(reopened.queries()[0].sql, edited);
    // The generated SQL in the session is untouched by the edit.
    assert_eq!(wb.session().current().unwrap().generated_sql, CANNED_SQL);
}

#[tokio::test]
async fn test_reset_discards_edits() {
    let dir = TempDir::new().unwrap();
    let mut wb = validator_workbench(
        &dir,
        Arc::new(MockAnswerClient::canned()),
        Arc::new(MockCatalogClient::new()),
        None,
    );

    submit(&mut wb, "show me west region orders").await;
    wb.session_mut().set_edited_sql("SELECT 1");
    assert!(wb.session().current().unwrap().is_dirty());

    let items = submit(&mut wb, "/reset").await;
    assert!(info_containing(&items, "Restored the generated SQL"));
    assert_eq!(wb.session().edited_sql(), Some(CANNED_SQL));
}

#[tokio::test]
async fn test_save_requires_a_name() {
    let dir = TempDir::new().unwrap();
    let mut wb = validator_workbench(
        &dir,
        Arc::new(MockAnswerClient::canned()),
        Arc::new(MockCatalogClient::new()),
        None,
    );

    submit(&mut wb, "show me west region orders").await;

    let items = submit(&mut wb, "/save").await;
    assert!(error_containing(&items, "A name is required"));
    let items = submit(&mut wb, "/save   ").await;
    assert!(error_containing(&items, "A name is required"));

    // Nothing was written.
    assert!(!store_path(&dir).exists());
}

#[tokio::test]
async fn test_save_requires_a_current_query() {
    let dir = TempDir::new().unwrap();
    let mut wb = validator_workbench(
        &dir,
        Arc::new(MockAnswerClient::canned()),
        Arc::new(MockCatalogClient::new()),
        None,
    );

    let items = submit(&mut wb, "/save orphan").await;
    assert!(error_containing(&items, "Nothing to save"));
    assert!(!store_path(&dir).exists());
}

#[tokio::test]
async fn test_saved_query_is_matched_on_the_assistant_dashboard() {
    // Full circle: curate a query in the validator, switch dashboards, and
    // have the assistant reuse it for the next similar question.
    let dir = TempDir::new().unwrap();
    let answer = Arc::new(MockAnswerClient::canned());
    let catalog = Arc::new(MockCatalogClient::new());
    let oracle = Arc::new(MockOracle::new().with_reply(
        r#"{"match": true, "query_number": 1, "similarity": 92, "modification_needed": false, "modifications": ""}"#,
    ));

    let mut wb = validator_workbench(&dir, answer.clone(), catalog.clone(), Some(oracle.clone()));

    submit(&mut wb, "show me west region orders").await;
    submit(&mut wb, "/save west_orders").await;
    // Curating never consults the oracle.
    assert_eq!(oracle.call_count(), 0);

    submit(&mut wb, "/mode assistant").await;
    let items = submit(&mut wb, "which orders went to the west region").await;

    assert!(info_containing(&items, "west_orders"));
    assert_eq!(catalog.executed(), vec![CANNED_SQL]);
    // One answer-service call from curation; the assistant ask reused the
    // verified SQL instead of asking again.
    assert_eq!(answer.asked().len(), 1);
}
