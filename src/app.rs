//! Core orchestrator for Vouch.
//!
//! Coordinates the answer service, the catalog, the oracle and the verified
//! query store to implement both dashboards. Every component failure is
//! folded into the feed as an error item; the workbench itself keeps going.

use std::sync::Arc;
use std::time::Instant;

use crate::answer::AnswerClient;
use crate::catalog::{CatalogClient, ExecutionOutcome, TableData};
use crate::cli::Dashboard;
use crate::error::Result;
use crate::oracle::{Oracle, QueryMatch, QueryMatcher, SqlAdjuster};
use crate::session::{CurrentQuery, Session};
use crate::store::{QueryStore, VerifiedQuery};
use tracing::{debug, info, warn};

/// Help text displayed for the /help command.
const HELP_TEXT: &str = r#"Available commands:
  /mode <assistant|validator> - Switch dashboard
  /run [sql]       - Run SQL through the catalog (defaults to the editor contents)
  /save <name>     - Save the current SQL to the verified collection
  /reset           - Restore the generated SQL, discarding edits
  /queries         - List the verified query collection
  /history         - Show questions asked this session
  /related <n>     - Ask the nth related question
  /clear           - Clear the feed
  /help            - Show this help message
  /quit, /exit     - Exit the application

Anything typed without a leading / is asked as a question.

Keyboard shortcuts:
  Ctrl+C, Ctrl+Q  - Exit application
  Tab             - Switch focus between panels
  Enter           - Submit input
  Esc             - Return focus to the input
  ↑/↓             - Recall recent questions or scroll"#;

/// One entry in the feed transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem {
    /// A question or command the analyst submitted.
    Question(String),
    /// Prose from the answer service or a verified query's explanation.
    Answer(String),
    /// A SQL statement, labelled by where it came from.
    Sql { label: &'static str, sql: String },
    /// An executed result table.
    Table(TableData),
    /// Status or guidance.
    Info(String),
    /// A surfaced failure.
    Error(String),
}

/// Result of processing user input.
#[derive(Debug)]
pub enum InputResult {
    /// No action needed (empty input).
    None,
    /// Items to append to the feed.
    Items(Vec<FeedItem>),
    /// A query was saved under `name`; the TUI confirms with a toast.
    Saved { items: Vec<FeedItem>, name: String },
    /// The feed should be cleared.
    Clear,
    /// Application should exit.
    Exit,
}

/// The main orchestrator that coordinates all components.
pub struct Workbench {
    answer: Arc<dyn AnswerClient>,
    catalog: Arc<dyn CatalogClient>,
    matcher: Option<QueryMatcher>,
    adjuster: Option<SqlAdjuster>,
    store: QueryStore,
    session: Session,
    row_limit: usize,
}

impl Workbench {
    /// Creates a workbench. Without an oracle, matching and adjustment are
    /// skipped and every question goes straight to the answer service.
    pub fn new(
        answer: Arc<dyn AnswerClient>,
        catalog: Arc<dyn CatalogClient>,
        oracle: Option<Arc<dyn Oracle>>,
        store: QueryStore,
        session: Session,
        row_limit: usize,
    ) -> Self {
        let (matcher, adjuster) = match oracle {
            Some(oracle) => (
                Some(QueryMatcher::new(oracle.clone())),
                Some(SqlAdjuster::new(oracle)),
            ),
            None => (None, None),
        };

        Self {
            answer,
            catalog,
            matcher,
            adjuster,
            store,
            session,
            row_limit,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    pub fn dashboard(&self) -> Dashboard {
        self.session.dashboard
    }

    pub fn has_oracle(&self) -> bool {
        self.matcher.is_some()
    }

    /// Handles user input and returns the result.
    pub async fn handle_input(&mut self, input: &str) -> Result<InputResult> {
        let input = input.trim();

        if input.is_empty() {
            return Ok(InputResult::None);
        }

        if input.starts_with('/') {
            return self.handle_command(input).await;
        }

        let items = self.handle_question(input).await;
        Ok(InputResult::Items(items))
    }

    /// Handles a command (input starting with /).
    async fn handle_command(&mut self, input: &str) -> Result<InputResult> {
        let parts: Vec<&str> = input.splitn(2, ' ').collect();
        let command = parts[0].to_lowercase();
        let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match command.as_str() {
            "/help" => Ok(InputResult::Items(vec![FeedItem::Info(
                HELP_TEXT.to_string(),
            )])),
            "/mode" => Ok(InputResult::Items(self.handle_mode(args))),
            "/run" => Ok(InputResult::Items(self.handle_run(args).await)),
            "/save" => Ok(self.handle_save(args)),
            "/reset" => Ok(InputResult::Items(self.handle_reset())),
            "/queries" => Ok(InputResult::Items(self.handle_queries())),
            "/history" => Ok(InputResult::Items(self.handle_history())),
            "/related" => Ok(InputResult::Items(self.handle_related(args).await)),
            "/clear" => {
                self.session.clear_current();
                Ok(InputResult::Clear)
            }
            "/quit" | "/exit" => Ok(InputResult::Exit),
            _ => Ok(InputResult::Items(vec![FeedItem::Error(format!(
                "Unknown command: {command}. Type /help for available commands."
            ))])),
        }
    }

    /// Routes a question to the current dashboard's flow.
    async fn handle_question(&mut self, question: &str) -> Vec<FeedItem> {
        info!(dashboard = %self.session.dashboard, question = %question, "handling question");

        match self.session.dashboard {
            Dashboard::Assistant => self.assistant_flow(question).await,
            Dashboard::Validator => self.ask_answer_service(question, true).await,
        }
    }

    /// The assistant flow: verified queries first, answer service as fallback.
    async fn assistant_flow(&mut self, question: &str) -> Vec<FeedItem> {
        self.store.reload();

        let verdict = match &self.matcher {
            Some(matcher) => Some(matcher.find_match(question, self.store.queries()).await),
            None => {
                debug!("no oracle configured, skipping the verified collection");
                None
            }
        };

        match verdict {
            Some(Ok(Some(matched))) => self.run_verified(question, matched).await,
            Some(Ok(None)) => {
                let mut items = Vec::new();
                if !self.store.is_empty() {
                    items.push(FeedItem::Info(
                        "No matching verified query. Asking the answer service.".to_string(),
                    ));
                }
                items.extend(self.ask_answer_service(question, false).await);
                items
            }
            Some(Err(e)) => {
                warn!(error = %e, "match attempt failed");
                let mut items = vec![FeedItem::Error(e.to_string())];
                items.extend(self.ask_answer_service(question, false).await);
                items
            }
            None => self.ask_answer_service(question, false).await,
        }
    }

    /// Executes a matched verified query, adjusting it first when asked to.
    async fn run_verified(&mut self, question: &str, matched: QueryMatch) -> Vec<FeedItem> {
        let mut items = vec![FeedItem::Info(format!(
            "Matched verified query \"{}\" ({:.0}% similar).",
            matched.query.name, matched.similarity
        ))];

        if !matched.query.query_explanation.trim().is_empty() {
            items.push(FeedItem::Answer(matched.query.query_explanation.clone()));
        }

        let mut sql = matched.query.sql.clone();

        if matched.modification_needed && !matched.modifications.trim().is_empty() {
            if let Some(adjuster) = &self.adjuster {
                items.push(FeedItem::Info(format!(
                    "Adjusting the verified SQL: {}",
                    matched.modifications
                )));
                match adjuster.adjust(&sql, &matched.modifications).await {
                    Ok(adjusted) => sql = adjusted,
                    Err(e) => {
                        warn!(error = %e, "adjustment failed, keeping the verified SQL");
                        items.push(FeedItem::Error(e.to_string()));
                        items.push(FeedItem::Info(
                            "Running the verified SQL unchanged.".to_string(),
                        ));
                    }
                }
            }
        }

        items.push(FeedItem::Sql {
            label: "Verified SQL",
            sql: sql.clone(),
        });
        items.extend(self.execute_sql(&sql).await);

        self.session.set_current(
            CurrentQuery::new(question, sql.clone())
                .with_explanation(matched.query.query_explanation.clone()),
        );
        self.session.record(question, &sql);

        items
    }

    /// Asks the answer service and renders its reply.
    ///
    /// With `save_hint` set (the validator flow), a reminder about /save is
    /// appended when the reply carries SQL.
    async fn ask_answer_service(&mut self, question: &str, save_hint: bool) -> Vec<FeedItem> {
        let reply = match self.answer.ask(question).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "answer service request failed");
                return vec![FeedItem::Error(e.to_string())];
            }
        };

        let mut items = Vec::new();

        if !reply.answer.trim().is_empty() {
            items.push(FeedItem::Answer(reply.answer.clone()));
        }

        if reply.has_sql() {
            items.push(FeedItem::Sql {
                label: "Generated SQL",
                sql: reply.sql_query.clone(),
            });
        }

        let table = reply.result_table();
        if !table.is_empty() {
            items.push(FeedItem::Table(table));
        }

        if !reply.tables_used.is_empty() {
            items.push(FeedItem::Info(format!(
                "Tables used: {}",
                reply.tables_used.join(", ")
            )));
        }

        if !reply.related_questions.is_empty() {
            let listed: Vec<String> = reply
                .related_questions
                .iter()
                .enumerate()
                .map(|(i, q)| format!("  {}. {q}", i + 1))
                .collect();
            items.push(FeedItem::Info(format!(
                "Related questions (/related <n> to ask):\n{}",
                listed.join("\n")
            )));
        }

        if save_hint && reply.has_sql() {
            items.push(FeedItem::Info(
                "Edit the SQL if needed, then /save <name> to add it to the verified collection."
                    .to_string(),
            ));
        }

        self.session.set_current(
            CurrentQuery::new(question, reply.sql_query.clone())
                .with_explanation(reply.query_explanation.clone())
                .with_tables_used(reply.tables_used.clone())
                .with_related_questions(reply.related_questions.clone()),
        );
        self.session.record(question, &reply.sql_query);

        items
    }

    /// Runs SQL through the catalog, timing the round trip.
    async fn execute_sql(&self, sql: &str) -> Vec<FeedItem> {
        let started = Instant::now();
        match self.catalog.execute(sql, self.row_limit).await {
            ExecutionOutcome::Success(table) => {
                let elapsed = started.elapsed();
                info!(rows = table.row_count(), elapsed_ms = elapsed.as_millis() as u64, "query executed");
                vec![FeedItem::Table(table.with_elapsed(elapsed))]
            }
            ExecutionOutcome::Failure { status, message } => {
                warn!(status = status, "query execution failed");
                vec![FeedItem::Error(format!(
                    "Execution failed (HTTP {status}): {message}"
                ))]
            }
        }
    }

    fn handle_mode(&mut self, args: &str) -> Vec<FeedItem> {
        if args.is_empty() {
            return vec![FeedItem::Info(format!(
                "Current dashboard: {}. Usage: /mode <assistant|validator>",
                self.session.dashboard.label()
            ))];
        }

        match args.parse::<Dashboard>() {
            Ok(dashboard) => {
                self.session.dashboard = dashboard;
                vec![FeedItem::Info(format!(
                    "Switched to the {} dashboard.",
                    dashboard.label()
                ))]
            }
            Err(e) => vec![FeedItem::Error(e)],
        }
    }

    async fn handle_run(&mut self, args: &str) -> Vec<FeedItem> {
        let sql = if args.is_empty() {
            match self.session.edited_sql() {
                Some(sql) if !sql.trim().is_empty() => sql.to_string(),
                _ => {
                    return vec![FeedItem::Error(
                        "No SQL to run. Provide it as /run <sql> or ask a question first."
                            .to_string(),
                    )]
                }
            }
        } else {
            args.to_string()
        };

        let mut items = vec![FeedItem::Sql {
            label: "SQL",
            sql: sql.clone(),
        }];
        items.extend(self.execute_sql(&sql).await);
        items
    }

    /// Validates and saves the current SQL under the given name.
    fn handle_save(&mut self, name: &str) -> InputResult {
        let name = name.trim();
        if name.is_empty() {
            return InputResult::Items(vec![FeedItem::Error(
                "A name is required. Usage: /save <name>".to_string(),
            )]);
        }

        let current = match self.session.current() {
            Some(current) => current.clone(),
            None => {
                return InputResult::Items(vec![FeedItem::Error(
                    "Nothing to save. Ask a question first.".to_string(),
                )])
            }
        };

        if current.edited_sql.trim().is_empty() {
            return InputResult::Items(vec![FeedItem::Error(
                "The current query has no SQL to save.".to_string(),
            )]);
        }

        let record = VerifiedQuery::new(
            name,
            &current.question,
            &current.explanation,
            &current.edited_sql,
            &self.session.analyst,
        );

        match self.store.append(record) {
            Ok(()) => {
                info!(name = %name, "verified query saved");
                InputResult::Saved {
                    items: vec![FeedItem::Info(format!(
                        "Saved \"{name}\" to {}.",
                        self.store.path().display()
                    ))],
                    name: name.to_string(),
                }
            }
            Err(e) => InputResult::Items(vec![FeedItem::Error(e.to_string())]),
        }
    }

    fn handle_reset(&mut self) -> Vec<FeedItem> {
        match self.session.current_mut() {
            Some(current) => {
                current.reset_sql();
                vec![FeedItem::Info(
                    "Restored the generated SQL, edits discarded.".to_string(),
                )]
            }
            None => vec![FeedItem::Error("Nothing to reset.".to_string())],
        }
    }

    fn handle_queries(&mut self) -> Vec<FeedItem> {
        self.store.reload();

        if self.store.is_empty() {
            return vec![FeedItem::Info(
                "The verified collection is empty. Use the validator dashboard to add queries."
                    .to_string(),
            )];
        }

        let listed: Vec<String> = self
            .store
            .queries()
            .iter()
            .enumerate()
            .map(|(i, q)| {
                format!(
                    "  {}. {} (verified by {} on {})\n     {}",
                    i + 1,
                    q.name,
                    q.verified_by,
                    q.verified_at,
                    q.question
                )
            })
            .collect();

        vec![FeedItem::Info(format!(
            "Verified queries ({}):\n{}",
            self.store.len(),
            listed.join("\n")
        ))]
    }

    fn handle_history(&self) -> Vec<FeedItem> {
        if self.session.history.is_empty() {
            return vec![FeedItem::Info("No questions asked yet.".to_string())];
        }

        let listed: Vec<String> = self
            .session
            .history
            .iter()
            .enumerate()
            .map(|(i, e)| format!("  {}. [{}] {}", i + 1, e.asked_at, e.question))
            .collect();

        vec![FeedItem::Info(format!(
            "This session (newest first):\n{}",
            listed.join("\n")
        ))]
    }

    async fn handle_related(&mut self, args: &str) -> Vec<FeedItem> {
        let index: usize = match args.parse() {
            Ok(n) => n,
            Err(_) => {
                return vec![FeedItem::Error(
                    "Usage: /related <n> where n is a number from the related list.".to_string(),
                )]
            }
        };

        let related = match self.session.current() {
            Some(current) => current.related_questions.clone(),
            None => {
                return vec![FeedItem::Error(
                    "No related questions yet. Ask a question first.".to_string(),
                )]
            }
        };

        let question = match index.checked_sub(1).and_then(|i| related.get(i)) {
            Some(question) => question.clone(),
            None => {
                return vec![FeedItem::Error(format!(
                    "No related question {index}. There are {} to pick from.",
                    related.len()
                ))]
            }
        };

        let mut items = vec![FeedItem::Info(format!("Asking: {question}"))];
        items.extend(self.handle_question(&question).await);
        items
    }
}
