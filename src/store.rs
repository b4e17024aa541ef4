//! Flat-file persistence for verified queries.
//!
//! The backing file is a YAML document with a single top-level
//! `verified_queries` list. Analysts append to it through the Validator
//! dashboard; nothing in the application deletes or updates records.

use crate::error::{Result, VouchError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An analyst-approved mapping from a natural-language question to SQL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifiedQuery {
    /// Display name chosen at save time. Uniqueness is not enforced.
    pub name: String,

    /// The natural-language question the SQL answers.
    pub question: String,

    /// Date of verification, formatted "%d %B %Y" (e.g. "21 August 2026").
    pub verified_at: String,

    /// Analyst who saved the record.
    pub verified_by: String,

    /// Explanation of the query, as produced by the answer service.
    pub query_explanation: String,

    /// The verified SQL text.
    pub sql: String,
}

impl VerifiedQuery {
    /// Builds a record stamped with today's date.
    pub fn new(
        name: impl Into<String>,
        question: impl Into<String>,
        query_explanation: impl Into<String>,
        sql: impl Into<String>,
        verified_by: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            question: question.into(),
            verified_at: chrono::Local::now().format("%d %B %Y").to_string(),
            verified_by: verified_by.into(),
            query_explanation: query_explanation.into(),
            sql: sql.into(),
        }
    }
}

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    verified_queries: Vec<VerifiedQuery>,
}

/// File-backed collection of verified queries.
///
/// Single-writer assumption: `append` rewrites the whole file with no lock
/// and no atomic rename. Concurrent sessions can lose each other's updates,
/// and a crash mid-write can leave a torn file; `load` treats a torn or
/// absent file as an empty collection rather than failing the session.
pub struct QueryStore {
    path: PathBuf,
    queries: Vec<VerifiedQuery>,
}

impl QueryStore {
    /// Opens the store at `path`. Never fails: unreadable or unparseable
    /// content yields an empty collection.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let queries = read_queries(&path);
        Self { path, queries }
    }

    /// Re-reads the backing file, picking up writes from other sessions.
    pub fn reload(&mut self) {
        self.queries = read_queries(&self.path);
    }

    /// The records in append order.
    pub fn queries(&self) -> &[VerifiedQuery] {
        &self.queries
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record and rewrites the entire backing file.
    pub fn append(&mut self, record: VerifiedQuery) -> Result<()> {
        self.queries.push(record);
        self.write_all()
    }

    fn write_all(&self) -> Result<()> {
        let doc = StoreFile {
            verified_queries: self.queries.clone(),
        };
        let yaml = serde_yaml::to_string(&doc)
            .map_err(|e| VouchError::store(format!("Failed to serialize verified queries: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    VouchError::store(format!(
                        "Failed to create store directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        fs::write(&self.path, yaml).map_err(|e| {
            VouchError::store(format!("Failed to write {}: {e}", self.path.display()))
        })?;

        debug!(path = %self.path.display(), count = self.queries.len(), "rewrote verified-query file");
        Ok(())
    }
}

fn read_queries(path: &Path) -> Vec<VerifiedQuery> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => {
            debug!(path = %path.display(), "no verified-query file, starting empty");
            return Vec::new();
        }
    };

    match serde_yaml::from_str::<StoreFile>(&content) {
        Ok(doc) => doc.verified_queries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unparseable verified-query file, treating as empty");
            Vec::new()
        }
    }
}
