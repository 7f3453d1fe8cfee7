//! Chat message type
//!
//! Messages are append-only log entries. The only mutations ever applied
//! are removing the transient typing placeholder and clearing
//! `task_suggestions` after a reject.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskboard::Task;

use crate::llm::{HistoryEntry, Sender};

/// Generate a chat message id
pub fn message_id() -> String {
    let uuid = uuid::Uuid::now_v7().simple().to_string();
    format!("msg-{}", &uuid[..8])
}

/// One entry in the chat log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique identifier
    pub id: String,

    /// Message text (empty for the typing placeholder)
    pub text: String,

    /// Who authored this message
    pub sender: Sender,

    /// When the message was appended
    pub timestamp: DateTime<Utc>,

    /// Task candidates attached to an assistant reply, until resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_suggestions: Option<Vec<Task>>,

    /// Transient placeholder shown while a request is in flight
    #[serde(default)]
    pub is_typing: bool,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: message_id(),
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            task_suggestions: None,
            is_typing: false,
        }
    }

    /// Create an assistant message
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            id: message_id(),
            text: text.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            task_suggestions: None,
            is_typing: false,
        }
    }

    /// Create the transient typing placeholder
    pub fn typing() -> Self {
        Self {
            id: message_id(),
            text: String::new(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            task_suggestions: None,
            is_typing: true,
        }
    }

    /// Attach task suggestions; an empty list attaches nothing
    pub fn with_suggestions(mut self, suggestions: Vec<Task>) -> Self {
        if !suggestions.is_empty() {
            self.task_suggestions = Some(suggestions);
        }
        self
    }

    /// Does this message carry unresolved suggestions?
    pub fn has_suggestions(&self) -> bool {
        self.task_suggestions.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Project to the triple sent to the completion service
    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry::new(self.text.clone(), self.sender, self.timestamp)
    }
}
