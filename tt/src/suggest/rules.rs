//! Extraction rule tables
//!
//! The heuristics live here as ordered data, separated from the extraction
//! control flow, so each rule set is testable on its own. Evaluation is
//! top-to-bottom, first match wins.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::LazyLock;

use taskboard::{FIELD_OPTIONS, Priority};

/// Phrases in the user message that signal task-creation intent
pub const TASK_INTENT_PHRASES: [&str; 9] = [
    "create task",
    "add task",
    "new task",
    "make task",
    "schedule",
    "todo",
    "to-do",
    "to do",
    "remind me",
];

/// Phrases in the assistant reply that signal a task suggestion
pub const SUGGESTION_PHRASES: [&str; 4] = [
    "i suggest creating a task",
    "you should create a task",
    "i recommend adding",
    "add this to your tasks",
];

/// Maximum title length before truncation
pub const TITLE_MAX_CHARS: usize = 60;

/// Characters kept when a title is truncated (an ellipsis marker is appended)
pub const TITLE_TRUNCATED_CHARS: usize = 57;

/// Default deadline offset when no explicit phrase overrides it
pub const DEFAULT_DEADLINE_DAYS: i64 = 3;

/// An urgency/deferral scan mapping matched terms to a priority
pub struct PriorityRule {
    pub pattern: Regex,
    pub priority: Priority,
}

/// Ordered priority rules; urgency is checked before deferral
pub static PRIORITY_RULES: LazyLock<Vec<PriorityRule>> = LazyLock::new(|| {
    vec![
        PriorityRule {
            pattern: Regex::new(r"(?i)urgent|asap|immediately|critical|emergency").expect("urgency pattern"),
            priority: Priority::High,
        },
        PriorityRule {
            pattern: Regex::new(r"(?i)whenever|sometime|later|eventually|low priority").expect("deferral pattern"),
            priority: Priority::Low,
        },
    ]
});

/// A deadline phrase mapping to an offset in days from now
pub struct DeadlineRule {
    pub phrase: &'static str,
    pub days: i64,
}

/// Ordered deadline overrides, checked before the default offset
pub const DEADLINE_RULES: [DeadlineRule; 2] = [
    DeadlineRule {
        phrase: "tomorrow",
        days: 1,
    },
    DeadlineRule {
        phrase: "next week",
        days: 7,
    },
];

/// Does the user message signal task-creation intent?
pub fn has_task_intent(user_message: &str) -> bool {
    let lower = user_message.to_lowercase();
    TASK_INTENT_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Does the assistant reply suggest creating a task?
pub fn suggests_task(assistant_text: &str) -> bool {
    let lower = assistant_text.to_lowercase();
    SUGGESTION_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Derive a title: user text up to the first period, truncated if long
pub fn derive_title(user_message: &str) -> String {
    let title = user_message.split('.').next().unwrap_or("").trim();
    if title.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = title.chars().take(TITLE_TRUNCATED_CHARS).collect();
        format!("{}...", truncated)
    } else {
        title.to_string()
    }
}

/// Infer a priority from urgency/deferral terms; Medium when nothing matches
pub fn infer_priority(user_message: &str) -> Priority {
    PRIORITY_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(user_message))
        .map(|rule| rule.priority)
        .unwrap_or(Priority::Medium)
}

/// Infer a field/category: first FIELD_OPTIONS entry mentioned in the text
pub fn infer_field(user_message: &str) -> &'static str {
    let lower = user_message.to_lowercase();
    FIELD_OPTIONS
        .iter()
        .find(|field| lower.contains(&field.to_lowercase()))
        .copied()
        .unwrap_or("Other")
}

/// Infer a deadline: explicit phrase overrides, else the default offset
pub fn infer_deadline(user_message: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let lower = user_message.to_lowercase();
    let days = DEADLINE_RULES
        .iter()
        .find(|rule| lower.contains(rule.phrase))
        .map(|rule| rule.days)
        .unwrap_or(DEFAULT_DEADLINE_DAYS);
    now + Duration::days(days)
}
