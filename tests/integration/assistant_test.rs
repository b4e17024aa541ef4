//! End-to-end tests for the assistant dashboard.
//!
//! A question first goes to the oracle for matching against the verified
//! collection; only when nothing matches does it fall through to the answer
//! service.

use std::sync::Arc;

use sql_vouch::answer::MockAnswerClient;
use sql_vouch::app::{FeedItem, InputResult, Workbench};
use sql_vouch::catalog::{MockCatalogClient, TableData};
use sql_vouch::cli::Dashboard;
use sql_vouch::oracle::{MockOracle, Oracle};
use sql_vouch::session::Session;
use sql_vouch::store::{QueryStore, VerifiedQuery};
use tempfile::TempDir;

const ORDERS_2019_SQL: &str = "SELECT COUNT(*) AS order_count FROM orders WHERE year = 2019";

fn seeded_store(dir: &TempDir) -> QueryStore {
    let mut store = QueryStore::load(dir.path().join("verified_queries.yaml"));
    store
        .append(VerifiedQuery::new(
            "orders_2019",
            "How many orders were there in 2019?",
            "Counts orders placed in 2019.",
            ORDERS_2019_SQL,
            "alice",
        ))
        .unwrap();
    store
}

fn assistant_workbench(
    answer: Arc<MockAnswerClient>,
    catalog: Arc<MockCatalogClient>,
    oracle: Option<Arc<MockOracle>>,
    store: QueryStore,
) -> Workbench {
    Workbench::new(
        answer,
        catalog,
        oracle.map(|o| o as Arc<dyn Oracle>),
        store,
        Session::new("tester", Dashboard::Assistant),
        100,
    )
}

async fn submit(wb: &mut Workbench, input: &str) -> Vec<FeedItem> {
    match wb.handle_input(input).await.unwrap() {
        InputResult::Items(items) => items,
        other => panic!("Expected feed items, got {other:?}"),
    }
}

fn info_containing(items: &[FeedItem], needle: &str) -> bool {
    items
        .iter()
        .any(|i| matches!(i, FeedItem::Info(text) if text.contains(needle)))
}

#[tokio::test]
async fn test_similar_question_reuses_verified_sql_with_adjustment() {
    // Scenario: the collection holds a delivered-orders query for 2018 and
    // the analyst asks about orders shipped in 2017. The oracle reports a
    // match that needs its year and alias changed, then rewrites the SQL.
    let verified_sql = r#"SELECT COUNT(*) AS "Number of Products Delivered" FROM orders WHERE year BETWEEN 2018 AND 2018"#;
    let adjusted_sql = r#"SELECT COUNT(*) AS "Number of Products Shipped" FROM orders WHERE year BETWEEN 2017 AND 2017"#;

    let dir = TempDir::new().unwrap();
    let mut store = QueryStore::load(dir.path().join("verified_queries.yaml"));
    store
        .append(VerifiedQuery::new(
            "orders_delivered_2018",
            "How many orders were delivered in 2018?",
            "Counts orders delivered during 2018.",
            verified_sql,
            "alice",
        ))
        .unwrap();

    let answer = Arc::new(MockAnswerClient::canned());
    let catalog = Arc::new(MockCatalogClient::with_table(TableData::new(
        vec!["Number of Products Shipped".to_string()],
        vec![vec!["128".to_string()]],
    )));
    let oracle = Arc::new(
        MockOracle::new()
            .with_reply(
                r#"{"match": true, "query_number": 1, "similarity": 85, "modification_needed": true, "modifications": "change the year range to 2017 and the alias to Number of Products Shipped"}"#,
            )
            .with_reply(format!("```sql\n{adjusted_sql}\n```")),
    );

    let mut wb = assistant_workbench(answer.clone(), catalog.clone(), Some(oracle.clone()), store);

    let items = submit(&mut wb, "how many orders shipped in 2017").await;

    // Match verdict, then adjustment: two oracle calls, no answer-service call.
    assert_eq!(oracle.call_count(), 2);
    assert!(answer.asked().is_empty());

    assert!(info_containing(&items, "orders_delivered_2018"));
    assert!(info_containing(&items, "change the year range"));
    assert!(items.iter().any(|i| matches!(
        i,
        FeedItem::Sql { label: "Verified SQL", sql } if sql == adjusted_sql
    )));
    assert!(items.iter().any(|i| matches!(i, FeedItem::Table(_))));

    // The adjusted SQL is what actually hit the catalog, with the table name
    // and aggregation preserved and only the alias and year changed.
    assert_eq!(catalog.executed(), vec![adjusted_sql]);
    assert!(adjusted_sql.contains("FROM orders") && adjusted_sql.contains("COUNT(*)"));
    assert!(!adjusted_sql.contains("2018"));

    // And it landed in the session, ready for /run or editing.
    let current = wb.session().current().unwrap();
    assert_eq!(current.question, "how many orders shipped in 2017");
    assert_eq!(current.edited_sql, adjusted_sql);
}

#[tokio::test]
async fn test_exact_match_runs_verified_sql_unchanged() {
    let dir = TempDir::new().unwrap();
    let answer = Arc::new(MockAnswerClient::canned());
    let catalog = Arc::new(MockCatalogClient::new());
    let oracle = Arc::new(MockOracle::new().with_reply(
        r#"{"match": true, "query_number": 1, "similarity": 97, "modification_needed": false, "modifications": ""}"#,
    ));

    let mut wb = assistant_workbench(
        answer.clone(),
        catalog.clone(),
        Some(oracle.clone()),
        seeded_store(&dir),
    );

    submit(&mut wb, "how many orders were there in 2019").await;

    // Only the match verdict; no adjustment call was needed.
    assert_eq!(oracle.call_count(), 1);
    assert!(answer.asked().is_empty());
    assert_eq!(catalog.executed(), vec![ORDERS_2019_SQL]);
}

#[tokio::test]
async fn test_no_match_falls_back_to_answer_service() {
    let dir = TempDir::new().unwrap();
    let answer = Arc::new(MockAnswerClient::canned());
    let catalog = Arc::new(MockCatalogClient::new());
    // Default mock verdict is no-match.
    let oracle = Arc::new(MockOracle::new());

    let mut wb = assistant_workbench(
        answer.clone(),
        catalog.clone(),
        Some(oracle),
        seeded_store(&dir),
    );

    let items = submit(&mut wb, "which city received the most orders").await;

    assert!(info_containing(&items, "No matching verified query"));
    assert_eq!(answer.asked(), vec!["which city received the most orders"]);
    // The fallback renders the service's own result; nothing runs through
    // the catalog.
    assert!(catalog.executed().is_empty());
    assert!(items
        .iter()
        .any(|i| matches!(i, FeedItem::Sql { label: "Generated SQL", .. })));
}

#[tokio::test]
async fn test_without_oracle_questions_go_straight_to_answer_service() {
    let dir = TempDir::new().unwrap();
    let answer = Arc::new(MockAnswerClient::canned());
    let catalog = Arc::new(MockCatalogClient::new());

    let mut wb = assistant_workbench(answer.clone(), catalog, None, seeded_store(&dir));

    let items = submit(&mut wb, "how many orders were there in 2019").await;

    assert_eq!(answer.asked().len(), 1);
    // No oracle means the collection is never consulted, so no match chatter.
    assert!(!info_containing(&items, "No matching verified query"));
    assert!(!wb.has_oracle());
}

#[tokio::test]
async fn test_history_keeps_ten_newest_questions() {
    let dir = TempDir::new().unwrap();
    let answer = Arc::new(MockAnswerClient::canned());
    let catalog = Arc::new(MockCatalogClient::new());

    let mut wb = assistant_workbench(
        answer,
        catalog,
        None,
        QueryStore::load(dir.path().join("verified_queries.yaml")),
    );

    for i in 1..=12 {
        submit(&mut wb, &format!("question number {i}")).await;
    }

    let history = &wb.session().history;
    assert_eq!(history.len(), 10);
    assert_eq!(history.question_at(0), Some("question number 12"));
    assert_eq!(history.question_at(9), Some("question number 3"));
}
