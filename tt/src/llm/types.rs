//! Completion request/response types
//!
//! These types model the boundary with the hosted completion service. The
//! service is opaque: it receives the new message, a fixed context string,
//! and a short history window, and returns reply text plus (optionally)
//! ready-made task suggestions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskboard::Task;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    #[default]
    User,
    Bot,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// One prior message carried along for conversational context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(text: impl Into<String>, sender: Sender, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp,
        }
    }
}

/// A completion request - everything needed for one service call
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// The user message being answered
    pub message: String,

    /// Fixed context string describing the assistant's role and goals
    pub context: String,

    /// Recent non-typing messages, oldest first
    pub history: Vec<HistoryEntry>,
}

/// Response from a completion request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    /// Reply text
    pub text: String,

    /// Task suggestions, when the service performs extraction itself
    #[serde(default)]
    pub task_suggestions: Option<Vec<Task>>,
}

impl CompletionResponse {
    /// A plain-text response with no suggestions
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            task_suggestions: None,
        }
    }
}
