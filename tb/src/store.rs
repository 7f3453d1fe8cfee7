//! In-memory task store
//!
//! The authoritative, insertion-ordered task collection. Ids are unique
//! (enforced on add) and every mutation emits a [`BoardEvent`] so
//! collaborators can describe the change without the store knowing about
//! presentation.

use thiserror::Error;
use tracing::debug;

use crate::events::{BoardEvent, BoardEvents};
use crate::task::{Column, Creator, Priority, Task, TaskPatch};

/// Errors from store operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Duplicate task id: {0}")]
    DuplicateId(String),

    #[error("Task not found: {0}")]
    NotFound(String),
}

/// Filter for [`TaskStore::list`]; all present facets must match
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub column: Option<Column>,
    pub priority: Option<Priority>,
    pub field: Option<String>,
    pub tag: Option<String>,
    pub created_by: Option<Creator>,
}

impl TaskFilter {
    /// Filter tasks in a single column
    pub fn by_column(column: Column) -> Self {
        Self {
            column: Some(column),
            ..Self::default()
        }
    }

    /// Check whether a task matches every present facet
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(column) = self.column
            && task.column != column
        {
            return false;
        }
        if let Some(priority) = self.priority
            && task.priority != priority
        {
            return false;
        }
        if let Some(field) = &self.field
            && task.field.as_deref() != Some(field.as_str())
        {
            return false;
        }
        if let Some(tag) = &self.tag
            && !task.tags.iter().any(|t| t == tag)
        {
            return false;
        }
        if let Some(created_by) = self.created_by
            && task.created_by != created_by
        {
            return false;
        }
        true
    }
}

/// In-memory, insertion-ordered collection of tasks
pub struct TaskStore {
    tasks: Vec<Task>,
    events: BoardEvents,
}

impl TaskStore {
    /// Create an empty store with its own event channel
    pub fn new() -> Self {
        debug!("TaskStore::new: called");
        Self {
            tasks: Vec::new(),
            events: BoardEvents::default(),
        }
    }

    /// Subscribe to mutation events
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Add a task. Fails with [`StoreError::DuplicateId`] if the id exists.
    pub fn add(&mut self, task: Task) -> Result<(), StoreError> {
        debug!(task_id = %task.id, title = %task.title, "TaskStore::add: called");
        if self.contains(&task.id) {
            debug!(task_id = %task.id, "TaskStore::add: duplicate id");
            return Err(StoreError::DuplicateId(task.id));
        }
        self.events.task_added(&task);
        self.tasks.push(task);
        Ok(())
    }

    /// Look up a task by id
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Check whether an id is present
    pub fn contains(&self, id: &str) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Apply a patch to a task and emit a task-updated event.
    ///
    /// Returns the updated task. `created_at` is untouchable by
    /// construction: [`TaskPatch`] has no field for it.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Task, StoreError> {
        debug!(task_id = %id, "TaskStore::update: called");
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        task.apply(patch);
        let updated = task.clone();
        self.events.task_updated(&updated);
        Ok(updated)
    }

    /// Move a task to another column.
    ///
    /// Convenience over [`TaskStore::update`] restricted to the column
    /// field; emits the same task-updated event as a full update.
    pub fn move_column(&mut self, id: &str, column: Column) -> Result<Task, StoreError> {
        debug!(task_id = %id, %column, "TaskStore::move_column: called");
        self.update(id, TaskPatch::move_to(column))
    }

    /// Remove a task by id, returning it
    pub fn remove(&mut self, id: &str) -> Result<Task, StoreError> {
        debug!(task_id = %id, "TaskStore::remove: called");
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let task = self.tasks.remove(index);
        self.events.task_removed(&task);
        Ok(task)
    }

    /// List tasks in insertion order, optionally filtered
    pub fn list(&self, filter: Option<&TaskFilter>) -> Vec<Task> {
        match filter {
            Some(filter) => self.tasks.iter().filter(|t| filter.matches(t)).cloned().collect(),
            None => self.tasks.clone(),
        }
    }

    /// Borrow the full task slice in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks in the store
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_list_contains_exactly_one() {
        let mut store = TaskStore::new();
        let task = Task::new("Only one");
        let id = task.id.clone();

        store.add(task).unwrap();

        let listed = store.list(None);
        assert_eq!(listed.iter().filter(|t| t.id == id).count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_duplicate_id_fails() {
        let mut store = TaskStore::new();
        let task = Task::new("Twice");
        let dup = task.clone();

        store.add(task).unwrap();
        let err = store.add(dup).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_absent_id_fails() {
        let mut store = TaskStore::new();
        let err = store.update("missing", TaskPatch::default()).unwrap_err();
        assert_eq!(err, StoreError::NotFound("missing".to_string()));
    }

    #[test]
    fn test_remove_absent_id_fails() {
        let mut store = TaskStore::new();
        assert!(matches!(store.remove("missing"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_update_patches_fields_and_keeps_created_at() {
        let mut store = TaskStore::new();
        let task = Task::new("Patch target");
        let id = task.id.clone();
        let created_at = task.created_at;
        store.add(task).unwrap();

        let updated = store
            .update(
                &id,
                TaskPatch {
                    title: Some("Patched".to_string()),
                    priority: Some(Priority::High),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Patched");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.created_at, created_at);
    }

    #[test]
    fn test_move_column_changes_only_column() {
        let mut store = TaskStore::new();
        let task = Task::new("Mover").with_priority(Priority::Low);
        let id = task.id.clone();
        store.add(task).unwrap();

        let moved = store.move_column(&id, Column::Done).unwrap();
        assert_eq!(moved.column, Column::Done);
        assert_eq!(moved.priority, Priority::Low);
        assert_eq!(moved.title, "Mover");
    }

    #[test]
    fn test_move_column_emits_task_updated() {
        let mut store = TaskStore::new();
        let task = Task::new("Observable move");
        let id = task.id.clone();
        store.add(task).unwrap();

        let mut rx = store.subscribe();
        store.move_column(&id, Column::InProgress).unwrap();

        match rx.try_recv().unwrap() {
            BoardEvent::TaskUpdated { task } => assert_eq!(task.column, Column::InProgress),
            other => panic!("Expected TaskUpdated, got {:?}", other),
        }
    }

    #[test]
    fn test_add_and_remove_emit_events() {
        let mut store = TaskStore::new();
        let mut rx = store.subscribe();

        let task = Task::new("Event source");
        let id = task.id.clone();
        store.add(task).unwrap();
        store.remove(&id).unwrap();

        assert!(matches!(rx.try_recv().unwrap(), BoardEvent::TaskAdded { .. }));
        assert!(matches!(rx.try_recv().unwrap(), BoardEvent::TaskRemoved { .. }));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut store = TaskStore::new();
        let first = Task::new("First");
        let second = Task::new("Second");
        let third = Task::new("Third");
        let expected = vec![first.id.clone(), second.id.clone(), third.id.clone()];
        for task in [first, second, third] {
            store.add(task).unwrap();
        }

        let ids: Vec<String> = store.list(None).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_list_with_filter() {
        let mut store = TaskStore::new();
        store.add(Task::new("Design pass").with_field("Design")).unwrap();
        store
            .add(Task::new("Ship it").with_column(Column::InProgress).with_tag("ai-generated"))
            .unwrap();
        store.add(Task::new("Done deal").with_column(Column::Done)).unwrap();

        assert_eq!(store.list(Some(&TaskFilter::by_column(Column::Done))).len(), 1);

        let by_tag = TaskFilter {
            tag: Some("ai-generated".to_string()),
            ..Default::default()
        };
        let tagged = store.list(Some(&by_tag));
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].title, "Ship it");

        let by_field = TaskFilter {
            field: Some("Design".to_string()),
            ..Default::default()
        };
        assert_eq!(store.list(Some(&by_field))[0].title, "Design pass");
    }
}
