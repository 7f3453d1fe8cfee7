//! Chat session module
//!
//! The ordered message log, the send/accept/reject operations, and the
//! session event stream consumed by the presentation layer.

mod message;
mod session;

pub use message::{ChatMessage, message_id};
pub use session::{AcceptOutcome, ChatError, ChatEvent, ChatSession, SendOutcome};
