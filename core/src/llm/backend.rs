use async_trait::async_trait;

use super::types::{ChatCompletion, ChatRequest};
use crate::Result;

/// The remote chat completion service.
///
/// `LlmClient` talks HTTP; tests substitute scripted backends.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one request and wait for the assistant reply
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion>;
}
