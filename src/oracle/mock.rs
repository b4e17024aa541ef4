//! Mock oracle for testing and offline demo mode.

use super::Oracle;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Oracle that replays queued canned replies.
///
/// Replies queued with [`with_reply`](Self::with_reply) are returned in FIFO
/// order; once the queue is empty every completion returns the default
/// no-match verdict. All prompts are recorded for assertions.
pub struct MockOracle {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    default_reply: String,
}

impl MockOracle {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            default_reply: r#"{"match": false, "query_number": 0, "similarity": 0, "modification_needed": false, "modifications": ""}"#.to_string(),
        }
    }

    /// Queues a reply to return from the next unanswered completion.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(reply.into());
        self
    }

    /// Returns the prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Returns how many completions were requested.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());

        Ok(reply)
    }
}
