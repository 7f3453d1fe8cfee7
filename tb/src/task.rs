//! Task domain types
//!
//! A Task is a unit of work tracked on the board. Field names serialize in
//! camelCase and enum values in their wire form ("not-started", "medium",
//! "bot") because that is the contract the completion service speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_task_id;

/// Fixed field/category vocabulary for tasks
pub const FIELD_OPTIONS: [&str; 9] = [
    "Design",
    "Development",
    "Marketing",
    "Research",
    "LinkedIn",
    "Content",
    "Personal",
    "Health",
    "Other",
];

/// Board columns in display order
pub const COLUMNS: [Column; 3] = [Column::NotStarted, Column::InProgress, Column::Done];

/// Priority level for tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Workflow stage a task occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Column {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl Column {
    /// Wire identifier ("not-started", "in-progress", "done")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Human-readable column title
    pub fn title(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not-started" | "not started" | "todo" => Ok(Self::NotStarted),
            "in-progress" | "in progress" | "doing" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(format!("Unknown column: {}", s)),
        }
    }
}

/// Who created a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Creator {
    #[default]
    User,
    Bot,
}

impl std::fmt::Display for Creator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// A structured unit of work tracked on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Longer description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Priority for board ordering and display
    pub priority: Priority,

    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Current workflow stage
    pub column: Column,

    /// Whether a user or the assistant created this task
    pub created_by: Creator,

    /// Creation timestamp, immutable after creation
    pub created_at: DateTime<Utc>,

    /// Deadline, not required to be in the future
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,

    /// Field/category from [`FIELD_OPTIONS`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Task {
    /// Create a user-created task with a generated id and defaults
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: generate_task_id(&title),
            title,
            description: None,
            priority: Priority::Medium,
            tags: Vec::new(),
            column: Column::NotStarted,
            created_by: Creator::User,
            created_at: Utc::now(),
            deadline: None,
            field: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the column
    pub fn with_column(mut self, column: Column) -> Self {
        self.column = column;
        self
    }

    /// Set the creator
    pub fn with_created_by(mut self, created_by: Creator) -> Self {
        self.created_by = created_by;
        self
    }

    /// Set the creation timestamp (for deterministic construction)
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the deadline
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the field/category
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Apply a patch. `created_at` has no patch path and never changes.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(column) = patch.column {
            self.column = column;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = Some(deadline);
        }
        if let Some(field) = patch.field {
            self.field = Some(field);
        }
    }
}

/// Partial update for a task; absent fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub column: Option<Column>,
    pub deadline: Option<DateTime<Utc>>,
    pub field: Option<String>,
}

impl TaskPatch {
    /// A patch that only moves the task to another column
    pub fn move_to(column: Column) -> Self {
        Self {
            column: Some(column),
            ..Self::default()
        }
    }
}
