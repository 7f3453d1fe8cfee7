//! Terminal front end for the chat + board session

mod session;

pub use session::ReplSession;
