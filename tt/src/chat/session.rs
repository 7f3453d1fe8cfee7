//! Chat session management
//!
//! The session owns the ordered message log and mediates requests to the
//! completion service. One send may be in flight at a time; the service
//! call is the only suspension point. Service failures never corrupt the
//! log: the typing placeholder is removed, a notice is emitted, and no bot
//! message is appended.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use taskboard::{Task, TaskStore};

use crate::config::AssistantConfig;
use crate::llm::{CompletionClient, CompletionRequest, HistoryEntry};
use crate::suggest;

use super::message::ChatMessage;

/// Capacity of the session event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Notice shown when the completion service fails
const SERVICE_ERROR_NOTICE: &str = "The assistant couldn't respond. Please try again.";

/// Errors from suggestion resolution
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message not found: {0}")]
    UnknownMessage(String),
}

/// Result of a send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The assistant replied and the log grew by two messages
    Replied,
    /// Empty or whitespace-only input; nothing was appended
    EmptyInput,
    /// A send is already in flight; nothing was appended
    Busy,
    /// The service failed; only the user message remains, a notice was emitted
    ServiceFailed,
}

/// Result of accepting a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// The task was added to the store
    Added,
    /// The task id was already in the store; nothing changed
    AlreadyAccepted,
}

/// Events emitted by the session for the presentation layer
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A suggestion was confirmed and its task added to the store
    TaskAccepted { task: Task },

    /// Suggestions on a message were rejected and cleared
    SuggestionsRejected { message_id: String },

    /// Transient, dismissable user-visible notification
    Notice { message: String },
}

/// Ordered chat log plus completion-service orchestration
pub struct ChatSession {
    client: Arc<dyn CompletionClient>,
    context: String,
    history_limit: usize,
    messages: Vec<ChatMessage>,
    is_sending: bool,
    event_tx: broadcast::Sender<ChatEvent>,
}

impl ChatSession {
    /// Create a session talking to the given client
    pub fn new(client: Arc<dyn CompletionClient>, assistant: &AssistantConfig) -> Self {
        debug!(history_limit = assistant.history_limit, "ChatSession::new: called");
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            client,
            context: assistant.context.clone(),
            history_limit: assistant.history_limit,
            messages: Vec::new(),
            is_sending: false,
            event_tx,
        }
    }

    /// Subscribe to session events (notices, accepted tasks)
    pub fn subscribe_events(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    /// The ordered message log
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Is a send currently in flight?
    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    /// Send a user message and wait for the assistant reply.
    ///
    /// Empty input and re-entrant sends are rejected without touching the
    /// log. On success the reply carries any task suggestions: ones returned
    /// by the service directly, or ones derived by the extractor - a single
    /// extraction point covering both designs.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            debug!("send: empty input, ignoring");
            return SendOutcome::EmptyInput;
        }
        if self.is_sending {
            debug!("send: already in flight, rejecting");
            return SendOutcome::Busy;
        }

        debug!(text_len = text.len(), "send: called");
        self.is_sending = true;

        // History excludes the new user message; it travels in `message`
        let history = self.history_window();
        self.messages.push(ChatMessage::user(text));
        self.messages.push(ChatMessage::typing());

        let request = CompletionRequest {
            message: text.to_string(),
            context: self.context.clone(),
            history,
        };
        let result = self.client.complete(request).await;

        self.remove_typing();
        self.is_sending = false;

        match result {
            Ok(response) => {
                let suggestions = match response.task_suggestions {
                    Some(suggestions) if !suggestions.is_empty() => {
                        debug!(count = suggestions.len(), "send: service returned suggestions");
                        suggestions
                    }
                    _ => suggest::extract(text, &response.text),
                };
                self.messages.push(ChatMessage::bot(response.text).with_suggestions(suggestions));
                SendOutcome::Replied
            }
            Err(e) => {
                warn!(error = %e, "send: completion service failed");
                self.emit(ChatEvent::Notice {
                    message: SERVICE_ERROR_NOTICE.to_string(),
                });
                SendOutcome::ServiceFailed
            }
        }
    }

    /// Accept a suggestion: insert the task into the store and confirm.
    ///
    /// Idempotent per task id - a second accept for the same task leaves the
    /// store, the log, and the event stream untouched. The suggestion list
    /// stays on the originating message so it can render as accepted.
    pub fn accept_suggestion(
        &mut self,
        store: &mut TaskStore,
        message_id: &str,
        task: Task,
    ) -> Result<AcceptOutcome, ChatError> {
        debug!(%message_id, task_id = %task.id, "accept_suggestion: called");
        if !self.messages.iter().any(|m| m.id == message_id) {
            return Err(ChatError::UnknownMessage(message_id.to_string()));
        }

        if store.contains(&task.id) || store.add(task.clone()).is_err() {
            debug!(task_id = %task.id, "accept_suggestion: already accepted");
            return Ok(AcceptOutcome::AlreadyAccepted);
        }

        self.messages.push(ChatMessage::bot(confirmation_text(&task)));
        self.emit(ChatEvent::TaskAccepted { task });
        Ok(AcceptOutcome::Added)
    }

    /// Reject the suggestions on a message: clear them and acknowledge
    pub fn reject_suggestion(&mut self, message_id: &str) -> Result<(), ChatError> {
        debug!(%message_id, "reject_suggestion: called");
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| ChatError::UnknownMessage(message_id.to_string()))?;

        message.task_suggestions = None;
        self.messages.push(ChatMessage::bot(
            "No problem, I won't add those tasks. Let me know if you change your mind.",
        ));
        self.emit(ChatEvent::SuggestionsRejected {
            message_id: message_id.to_string(),
        });
        Ok(())
    }

    /// The most recent message still carrying suggestions, if any
    pub fn latest_suggestion_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.has_suggestions())
    }

    /// Last `history_limit` non-typing messages, oldest first
    fn history_window(&self) -> Vec<HistoryEntry> {
        let entries: Vec<HistoryEntry> = self
            .messages
            .iter()
            .filter(|m| !m.is_typing)
            .map(|m| m.history_entry())
            .collect();
        let skip = entries.len().saturating_sub(self.history_limit);
        entries.into_iter().skip(skip).collect()
    }

    /// Drop the typing placeholder from the log
    fn remove_typing(&mut self) {
        self.messages.retain(|m| !m.is_typing);
    }

    fn emit(&self, event: ChatEvent) {
        // Ignore send errors (no subscribers is OK)
        let _ = self.event_tx.send(event);
    }
}

/// Confirmation text for an accepted task: title, priority, deadline
fn confirmation_text(task: &Task) -> String {
    match task.deadline {
        Some(deadline) => format!(
            "Added \"{}\" to your board ({} priority, due {}).",
            task.title,
            task.priority,
            deadline.format("%b %-d")
        ),
        None => format!("Added \"{}\" to your board ({} priority).", task.title, task.priority),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, MockClient};
    use chrono::Utc;
    use taskboard::Priority;
    use tokio::sync::broadcast::error::TryRecvError;

    fn session_with(client: MockClient) -> ChatSession {
        ChatSession::new(Arc::new(client), &AssistantConfig::default())
    }

    #[tokio::test]
    async fn test_empty_send_is_silently_ignored() {
        let mut session = session_with(MockClient::replying("unused"));
        let mut events = session.subscribe_events();

        assert_eq!(session.send("").await, SendOutcome::EmptyInput);
        assert_eq!(session.send("   \n\t").await, SendOutcome::EmptyInput);

        assert!(session.messages().is_empty());
        assert!(!session.is_sending());
        // no notice either - validation failures are silent
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_send_rejected_while_in_flight() {
        let mut session = session_with(MockClient::replying("unused"));
        session.is_sending = true;

        assert_eq!(session.send("hello?").await, SendOutcome::Busy);
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_send_appends_user_and_bot_messages() {
        let mut session = session_with(MockClient::replying("Sure, I can help with that."));

        let outcome = session.send("add task to buy milk").await;
        assert_eq!(outcome, SendOutcome::Replied);

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "add task to buy milk");
        assert!(!messages.iter().any(|m| m.is_typing));
        assert!(!session.is_sending());

        // client-side extraction attached a candidate to the reply
        assert!(messages[1].has_suggestions());
    }

    #[tokio::test]
    async fn test_service_suggestions_take_precedence() {
        let canned = Task::new("From the service").with_priority(Priority::High);
        let canned_id = canned.id.clone();
        let client = MockClient::new(vec![Ok(CompletionResponse {
            text: "Here's what I'd add.".to_string(),
            task_suggestions: Some(vec![canned]),
        })]);
        let mut session = session_with(client);

        // no intent phrases in the user text; the extractor alone would find nothing
        session.send("what should I focus on this week?").await;

        let suggestions = session.messages()[1].task_suggestions.as_ref().unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].id, canned_id);
    }

    #[tokio::test]
    async fn test_service_failure_leaves_clean_log_and_one_notice() {
        let mut session = session_with(MockClient::failing());
        let mut events = session.subscribe_events();
        let before = session.messages().len();

        let outcome = session.send("add task that will fail").await;
        assert_eq!(outcome, SendOutcome::ServiceFailed);

        // only the user message remains, no typing placeholder, no bot message
        assert_eq!(session.messages().len(), before + 1);
        assert!(!session.messages().iter().any(|m| m.is_typing));
        assert!(!session.is_sending());

        // exactly one notice
        assert!(matches!(events.try_recv().unwrap(), ChatEvent::Notice { .. }));
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_history_window_caps_at_limit_and_skips_typing() {
        let client = Arc::new(MockClient::replying("noted"));
        let mut session = ChatSession::new(client.clone(), &AssistantConfig::default());

        for i in 0..4 {
            session.messages.push(ChatMessage::user(format!("user {}", i)));
            session.messages.push(ChatMessage::bot(format!("bot {}", i)));
        }
        // a stray typing placeholder must never reach the wire
        session.messages.push(ChatMessage::typing());

        session.send("latest question").await;

        let request = client.last_request().unwrap();
        assert_eq!(request.message, "latest question");
        // capped at the default limit of 5, newest last, typing excluded,
        // and the new user message is not duplicated into history
        assert_eq!(request.history.len(), 5);
        assert_eq!(request.history[0].text, "bot 1");
        assert_eq!(request.history[4].text, "bot 3");
        assert!(request.history.iter().all(|e| e.text != "latest question"));
    }

    #[tokio::test]
    async fn test_accept_suggestion_adds_task_and_confirms() {
        let mut session = session_with(MockClient::replying("unused"));
        let mut events = session.subscribe_events();
        let mut store = TaskStore::new();

        let task = Task::new("Accepted task")
            .with_priority(Priority::High)
            .with_deadline(Utc::now() + chrono::Duration::days(3));
        let message = ChatMessage::bot("I suggest creating a task.").with_suggestions(vec![task.clone()]);
        let message_id = message.id.clone();
        session.messages.push(message);

        let outcome = session.accept_suggestion(&mut store, &message_id, task.clone()).unwrap();
        assert_eq!(outcome, AcceptOutcome::Added);
        assert_eq!(store.len(), 1);

        // confirmation names title, priority, and deadline
        let confirmation = &session.messages().last().unwrap().text;
        assert!(confirmation.contains("Accepted task"));
        assert!(confirmation.contains("high"));
        assert!(confirmation.contains("due"));

        // suggestion list stays on the originating message
        assert!(session.messages()[0].has_suggestions());

        match events.try_recv().unwrap() {
            ChatEvent::TaskAccepted { task: accepted } => assert_eq!(accepted.id, task.id),
            other => panic!("Expected TaskAccepted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_accept_suggestion_is_idempotent_per_task_id() {
        let mut session = session_with(MockClient::replying("unused"));
        let mut store = TaskStore::new();

        let task = Task::new("Only once");
        let message = ChatMessage::bot("suggestion").with_suggestions(vec![task.clone()]);
        let message_id = message.id.clone();
        session.messages.push(message);

        assert_eq!(
            session.accept_suggestion(&mut store, &message_id, task.clone()).unwrap(),
            AcceptOutcome::Added
        );
        let log_len = session.messages().len();

        assert_eq!(
            session.accept_suggestion(&mut store, &message_id, task).unwrap(),
            AcceptOutcome::AlreadyAccepted
        );
        assert_eq!(store.len(), 1);
        // no second confirmation
        assert_eq!(session.messages().len(), log_len);
    }

    #[tokio::test]
    async fn test_accept_suggestion_unknown_message_fails() {
        let mut session = session_with(MockClient::replying("unused"));
        let mut store = TaskStore::new();

        let err = session
            .accept_suggestion(&mut store, "msg-missing", Task::new("Orphan"))
            .unwrap_err();
        assert_eq!(err, ChatError::UnknownMessage("msg-missing".to_string()));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_reject_suggestion_clears_and_acknowledges() {
        let mut session = session_with(MockClient::replying("unused"));
        let mut events = session.subscribe_events();

        let message = ChatMessage::bot("suggestion").with_suggestions(vec![Task::new("Unwanted")]);
        let message_id = message.id.clone();
        session.messages.push(message);

        session.reject_suggestion(&message_id).unwrap();

        assert!(!session.messages()[0].has_suggestions());
        assert!(session.messages().last().unwrap().text.contains("won't add"));
        assert!(matches!(
            events.try_recv().unwrap(),
            ChatEvent::SuggestionsRejected { .. }
        ));
    }

    #[tokio::test]
    async fn test_reject_suggestion_unknown_message_fails() {
        let mut session = session_with(MockClient::replying("unused"));
        assert!(session.reject_suggestion("msg-missing").is_err());
    }

    #[test]
    fn test_confirmation_text_without_deadline() {
        let task = Task::new("Unscheduled work");
        let text = confirmation_text(&task);
        assert!(text.contains("Unscheduled work"));
        assert!(text.contains("medium priority"));
        assert!(!text.contains("due"));
    }
}
