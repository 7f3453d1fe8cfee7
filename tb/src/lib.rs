//! TaskBoard - in-memory kanban task management
//!
//! The board side of TaskTracker: task domain types, an insertion-ordered
//! in-memory store with change notifications, and board reconciliation for
//! merging externally-produced tasks (accepted chat suggestions) into the
//! visible list without duplication.
//!
//! # Modules
//!
//! - [`task`] - Task record, priority/column/creator enums, patches
//! - [`store`] - TaskStore with add/update/move/remove/list
//! - [`events`] - broadcast notifications for every store mutation
//! - [`board`] - visible-list reconciliation (merge by id)
//! - [`id`] - task id generation

pub mod board;
pub mod events;
pub mod id;
pub mod store;
pub mod task;

// Re-export commonly used types
pub use board::Board;
pub use events::{BoardEvent, BoardEvents};
pub use id::generate_task_id;
pub use store::{StoreError, TaskFilter, TaskStore};
pub use task::{COLUMNS, Column, Creator, FIELD_OPTIONS, Priority, Task, TaskPatch};
