//! Completion service client module
//!
//! The hosted completion backend is an opaque collaborator: it takes the new
//! message plus context and history, and returns reply text (and optionally
//! ready-made task suggestions). This module provides the client trait, the
//! Gemini implementation, and the error taxonomy for that boundary.

use std::sync::Arc;

use tracing::debug;

mod client;
mod error;
mod gemini;
mod types;

pub use client::CompletionClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{CompletionRequest, CompletionResponse, HistoryEntry, Sender};

#[cfg(test)]
pub use client::mock::MockClient;

use crate::config::LlmConfig;

/// Create a completion client based on the provider specified in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn CompletionClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::InvalidResponse(format!(
                "Unknown completion provider: '{}'. Supported: gemini",
                other
            )))
        }
    }
}
