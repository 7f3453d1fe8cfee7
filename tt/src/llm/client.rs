//! CompletionClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless completion service client
///
/// Each call is independent: the request carries its own context string and
/// history window, so no conversation state lives in the client. The chat
/// session owns the log; the client only ferries one exchange.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one completion request and wait for the reply
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
