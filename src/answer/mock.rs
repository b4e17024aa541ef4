//! Mock answer-service clients for tests and offline demos.

use super::types::AnswerReply;
use super::AnswerClient;
use crate::error::{Result, VouchError};
use async_trait::async_trait;
use std::sync::Mutex;

/// An answer client that returns a canned reply and records every question.
pub struct MockAnswerClient {
    reply: AnswerReply,
    questions: Mutex<Vec<String>>,
}

impl MockAnswerClient {
    /// Creates a mock returning an empty reply.
    pub fn new() -> Self {
        Self::with_reply(AnswerReply::default())
    }

    /// Creates a mock returning the given reply for every question.
    pub fn with_reply(reply: AnswerReply) -> Self {
        Self {
            reply,
            questions: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock with a small plausible orders reply, for `--mock` runs.
    pub fn canned() -> Self {
        let reply: AnswerReply = serde_json::from_str(
            r#"{
                "answer": "There were 3 orders shipped to the west region.",
                "sql_query": "SELECT order_id, city FROM orders WHERE region = 'west'",
                "query_explanation": "Selects the id and city of every order shipped to the west region.",
                "tables_used": ["orders"],
                "related_questions": [
                    "how many orders shipped to the east region",
                    "which city received the most orders"
                ],
                "execution_result": {
                    "Row 1": [
                        {"columnName": "order_id", "value": 1001},
                        {"columnName": "city", "value": "Portland"}
                    ],
                    "Row 2": [
                        {"columnName": "order_id", "value": 1002},
                        {"columnName": "city", "value": "Eugene"}
                    ],
                    "Row 3": [
                        {"columnName": "order_id", "value": 1003},
                        {"columnName": "city", "value": "Salem"}
                    ]
                }
            }"#,
        )
        .unwrap_or_default();
        Self::with_reply(reply)
    }

    /// Questions received so far, in call order.
    pub fn asked(&self) -> Vec<String> {
        self.questions
            .lock()
            .map(|questions| questions.clone())
            .unwrap_or_default()
    }
}

impl Default for MockAnswerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerClient for MockAnswerClient {
    async fn ask(&self, question: &str) -> Result<AnswerReply> {
        if let Ok(mut questions) = self.questions.lock() {
            questions.push(question.to_string());
        }
        Ok(self.reply.clone())
    }
}

/// An answer client whose every ask fails with a fixed message.
pub struct FailingAnswerClient {
    message: String,
}

impl FailingAnswerClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl AnswerClient for FailingAnswerClient {
    async fn ask(&self, _question: &str) -> Result<AnswerReply> {
        Err(VouchError::answer(self.message.clone()))
    }
}
