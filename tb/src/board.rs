//! Board reconciliation
//!
//! The board holds the visible task list on the presentation side. Tasks
//! arriving from outside (accepted chat suggestions, store resyncs) are
//! merged by id: an incoming task whose id is already visible is skipped,
//! so duplicate delivery of the same accepted suggestion is harmless.

use tracing::debug;

use crate::task::{Column, Task, COLUMNS};

/// Presentation-side visible task list
#[derive(Debug, Default)]
pub struct Board {
    tasks: Vec<Task>,
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Create a board seeded with an initial task list
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Merge incoming tasks, skipping any whose id is already visible.
    ///
    /// Returns the number of tasks actually inserted.
    pub fn merge(&mut self, incoming: &[Task]) -> usize {
        let mut inserted = 0;
        for task in incoming {
            if self.tasks.iter().any(|t| t.id == task.id) {
                debug!(task_id = %task.id, "Board::merge: skipping already-visible task");
                continue;
            }
            self.tasks.push(task.clone());
            inserted += 1;
        }
        debug!(incoming = incoming.len(), inserted, "Board::merge: done");
        inserted
    }

    /// Replace the visible list wholesale (resync from the store)
    pub fn replace(&mut self, tasks: Vec<Task>) {
        debug!(count = tasks.len(), "Board::replace: called");
        self.tasks = tasks;
    }

    /// All visible tasks in merge order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Visible tasks in one column
    pub fn column_tasks(&self, column: Column) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.column == column).collect()
    }

    /// Per-column task counts in board order
    pub fn column_counts(&self) -> [(Column, usize); 3] {
        COLUMNS.map(|column| (column, self.tasks.iter().filter(|t| t.column == column).count()))
    }

    /// Number of visible tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if the board is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
