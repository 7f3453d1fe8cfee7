//! Board events - pub/sub notifications for task mutations
//!
//! Every store mutation emits a [`BoardEvent`] on a tokio broadcast channel.
//! Consumers (a notification UI, loggers) subscribe and describe the change
//! ("task X moved to column Y", "task X updated"); the store itself never
//! touches presentation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::task::Task;

/// Default channel capacity (events)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Notification emitted on every task mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoardEvent {
    /// A task was added to the store
    TaskAdded { task: Task },

    /// A task was updated (field edits and column moves alike)
    TaskUpdated { task: Task },

    /// A task was removed from the store
    TaskRemoved { task: Task },
}

impl BoardEvent {
    /// Short event name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TaskAdded { .. } => "TaskAdded",
            Self::TaskUpdated { .. } => "TaskUpdated",
            Self::TaskRemoved { .. } => "TaskRemoved",
        }
    }

    /// The task carried by this event
    pub fn task(&self) -> &Task {
        match self {
            Self::TaskAdded { task } | Self::TaskUpdated { task } | Self::TaskRemoved { task } => task,
        }
    }
}

/// Broadcast sender for board events
///
/// Emission is fire-and-forget: with no subscribers the event is dropped,
/// and a full channel drops its oldest events.
#[derive(Debug, Clone)]
pub struct BoardEvents {
    tx: broadcast::Sender<BoardEvent>,
}

impl BoardEvents {
    /// Create a new event channel with the given capacity
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "BoardEvents::new: creating channel");
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: BoardEvent) {
        debug!(event_type = event.event_type(), task_id = %event.task().id, "BoardEvents::emit");
        // Ignore send errors (no subscribers is OK)
        let _ = self.tx.send(event);
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        debug!("BoardEvents::subscribe: new subscriber");
        self.tx.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Emit a task-added event
    pub fn task_added(&self, task: &Task) {
        self.emit(BoardEvent::TaskAdded { task: task.clone() });
    }

    /// Emit a task-updated event
    pub fn task_updated(&self, task: &Task) {
        self.emit(BoardEvent::TaskUpdated { task: task.clone() });
    }

    /// Emit a task-removed event
    pub fn task_removed(&self, task: &Task) {
        self.emit(BoardEvent::TaskRemoved { task: task.clone() });
    }
}

impl Default for BoardEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_events_creation() {
        let events = BoardEvents::default();
        assert_eq!(events.subscriber_count(), 0);
    }

    #[test]
    fn test_emit_without_subscribers_does_not_panic() {
        let events = BoardEvents::new(8);
        events.task_added(&Task::new("No one is listening"));
    }

    #[test]
    fn test_emit_and_receive() {
        let events = BoardEvents::new(8);
        let mut rx = events.subscribe();

        let task = Task::new("Watch me");
        events.task_added(&task);

        match rx.try_recv().unwrap() {
            BoardEvent::TaskAdded { task: got } => assert_eq!(got.id, task.id),
            other => panic!("Expected TaskAdded, got {:?}", other),
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_multiple_subscribers_receive_all() {
        let events = BoardEvents::new(8);
        let mut rx1 = events.subscribe();
        let mut rx2 = events.subscribe();

        let task = Task::new("Fan out");
        events.task_updated(&task);

        assert_eq!(rx1.try_recv().unwrap().task().id, task.id);
        assert_eq!(rx2.try_recv().unwrap().task().id, task.id);
    }

    #[test]
    fn test_event_type_names() {
        let task = Task::new("Names");
        assert_eq!(BoardEvent::TaskAdded { task: task.clone() }.event_type(), "TaskAdded");
        assert_eq!(BoardEvent::TaskRemoved { task }.event_type(), "TaskRemoved");
    }
}
