//! Client layer for the hosted question-answering service.
//!
//! The service turns a natural-language question into generated SQL, an
//! explanation, executed rows, and follow-up suggestions.

mod http;
mod mock;
mod types;

pub use http::HttpAnswerClient;
pub use mock::{FailingAnswerClient, MockAnswerClient};
pub use types::AnswerReply;

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for answer-service clients.
#[async_trait]
pub trait AnswerClient: Send + Sync {
    /// Asks one question. A single attempt; any failure is an error the
    /// caller surfaces before falling back to an empty result.
    async fn ask(&self, question: &str) -> Result<AnswerReply>;
}
