//! Matches incoming questions against the verified query collection.

use super::parser::unwrap_reply;
use super::prompt::build_match_prompt;
use super::Oracle;
use crate::error::{Result, VouchError};
use crate::store::VerifiedQuery;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// A verified query judged semantically equivalent to the question.
#[derive(Debug, Clone)]
pub struct QueryMatch {
    pub query: VerifiedQuery,
    pub similarity: f64,
    pub modification_needed: bool,
    pub modifications: String,
}

/// Asks the oracle whether a question is answered by a verified query.
pub struct QueryMatcher {
    oracle: Arc<dyn Oracle>,
}

/// The oracle's verdict. All five fields are required; a reply missing any
/// of them is a protocol violation and fails the match outright.
#[derive(Deserialize)]
struct MatchReply {
    #[serde(rename = "match")]
    matched: bool,
    query_number: i64,
    similarity: f64,
    modification_needed: bool,
    modifications: String,
}

impl QueryMatcher {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Finds a verified query equivalent to `question`, if any.
    ///
    /// Returns `Ok(None)` when the collection is empty (no oracle call is
    /// made), when the oracle reports no match, or when the reported query
    /// number falls outside the collection. Returns an error when the oracle
    /// call fails or its reply does not parse as a verdict.
    pub async fn find_match(
        &self,
        question: &str,
        verified: &[VerifiedQuery],
    ) -> Result<Option<QueryMatch>> {
        if verified.is_empty() {
            debug!("no verified queries to match against");
            return Ok(None);
        }

        let prompt = build_match_prompt(question, verified);
        let raw = self.oracle.complete(&prompt).await?;
        let reply = unwrap_reply(&raw);

        let verdict: MatchReply = serde_json::from_str(&reply).map_err(|e| {
            debug!(raw = %raw, "unparseable match verdict");
            VouchError::oracle(format!("Could not parse the match verdict: {e}"))
        })?;

        if !verdict.matched {
            debug!(question = %question, "no match among verified queries");
            return Ok(None);
        }

        if verdict.query_number < 1 || verdict.query_number as usize > verified.len() {
            warn!(
                query_number = verdict.query_number,
                count = verified.len(),
                "match verdict points outside the collection"
            );
            return Ok(None);
        }

        let index = verdict.query_number as usize - 1;
        debug!(
            name = %verified[index].name,
            similarity = verdict.similarity,
            modification_needed = verdict.modification_needed,
            "matched verified query"
        );

        Ok(Some(QueryMatch {
            query: verified[index].clone(),
            similarity: verdict.similarity,
            modification_needed: verdict.modification_needed,
            modifications: verdict.modifications,
        }))
    }
}
