//! TaskTracker - chat-assisted kanban task management
//!
//! TaskTracker pairs an in-memory kanban board (the `taskboard` crate) with
//! a chat assistant that proposes structured tasks from natural-language
//! input. Free text goes to a hosted completion service; the suggestion
//! extractor turns the exchange into task candidates; accepting a candidate
//! commits it to the task store and merges it into the visible board.
//!
//! # Core Concepts
//!
//! - **One send in flight**: the completion call is the only suspension
//!   point, and re-entrant sends are rejected outright
//! - **Clean failure**: a service error removes the typing placeholder,
//!   emits a notice, and never corrupts the chat log
//! - **Events out, never UI in**: the core emits broadcast events; only the
//!   REPL layer prints
//!
//! # Modules
//!
//! - [`llm`] - completion client trait and Gemini implementation
//! - [`suggest`] - heuristic task-candidate extraction
//! - [`chat`] - message log and session orchestration
//! - [`repl`] - interactive terminal front end
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod chat;
pub mod cli;
pub mod config;
pub mod llm;
pub mod repl;
pub mod suggest;

// Re-export commonly used types
pub use chat::{AcceptOutcome, ChatError, ChatEvent, ChatMessage, ChatSession, SendOutcome};
pub use config::{AssistantConfig, Config, LlmConfig};
pub use llm::{CompletionClient, CompletionRequest, CompletionResponse, GeminiClient, HistoryEntry, LlmError, Sender};
pub use repl::ReplSession;
pub use suggest::{extract, extract_at};
