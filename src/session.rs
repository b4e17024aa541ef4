//! Per-run session state.
//!
//! Nothing in this module is persisted. History and the current query live
//! only as long as the process; the verified query collection on disk is the
//! sole durable artifact.

use crate::cli::Dashboard;
use std::collections::VecDeque;

/// Maximum number of history entries kept per session.
pub const HISTORY_CAP: usize = 10;

/// One asked question and the SQL that answered it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub question: String,
    pub sql: String,
    pub asked_at: String,
}

impl HistoryEntry {
    pub fn new(question: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            sql: sql.into(),
            asked_at: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

/// Bounded, newest-first question history.
#[derive(Debug, Default)]
pub struct QueryHistory {
    entries: VecDeque<HistoryEntry>,
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry, evicting the oldest once the cap is reached.
    ///
    /// Re-asking the question currently at the top replaces that entry
    /// instead of stacking duplicates.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self
            .entries
            .front()
            .is_some_and(|front| front.question == entry.question)
        {
            self.entries.pop_front();
        }

        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAP);
    }

    /// Iterates entries newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Returns up to `n` of the most recent entries.
    pub fn recent(&self, n: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().take(n).collect()
    }

    /// Returns the question at `index` (0 is the most recent).
    pub fn question_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.question.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The question currently on the workbench and everything derived from it.
#[derive(Debug, Clone, Default)]
pub struct CurrentQuery {
    pub question: String,
    pub generated_sql: String,
    pub edited_sql: String,
    pub explanation: String,
    pub tables_used: Vec<String>,
    pub related_questions: Vec<String>,
}

impl CurrentQuery {
    pub fn new(question: impl Into<String>, sql: impl Into<String>) -> Self {
        let generated_sql = sql.into();
        Self {
            question: question.into(),
            edited_sql: generated_sql.clone(),
            generated_sql,
            explanation: String::new(),
            tables_used: Vec::new(),
            related_questions: Vec::new(),
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_tables_used(mut self, tables: Vec<String>) -> Self {
        self.tables_used = tables;
        self
    }

    pub fn with_related_questions(mut self, related: Vec<String>) -> Self {
        self.related_questions = related;
        self
    }

    /// Discards manual edits, restoring the SQL that was generated.
    pub fn reset_sql(&mut self) {
        self.edited_sql = self.generated_sql.clone();
    }

    /// True when the SQL in the editor differs from the generated one.
    pub fn is_dirty(&self) -> bool {
        self.edited_sql != self.generated_sql
    }
}

/// Everything the workbench tracks for one run.
#[derive(Debug)]
pub struct Session {
    pub analyst: String,
    pub dashboard: Dashboard,
    pub history: QueryHistory,
    current: Option<CurrentQuery>,
}

impl Session {
    pub fn new(analyst: impl Into<String>, dashboard: Dashboard) -> Self {
        Self {
            analyst: analyst.into(),
            dashboard,
            history: QueryHistory::new(),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&CurrentQuery> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut CurrentQuery> {
        self.current.as_mut()
    }

    pub fn set_current(&mut self, current: CurrentQuery) {
        self.current = Some(current);
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Overwrites the editable SQL of the current query.
    ///
    /// Returns false when there is no current query to edit.
    pub fn set_edited_sql(&mut self, sql: impl Into<String>) -> bool {
        match self.current.as_mut() {
            Some(current) => {
                current.edited_sql = sql.into();
                true
            }
            None => false,
        }
    }

    pub fn edited_sql(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.edited_sql.as_str())
    }

    /// Records an answered question in the history.
    pub fn record(&mut self, question: &str, sql: &str) {
        self.history.push(HistoryEntry::new(question, sql));
    }
}
