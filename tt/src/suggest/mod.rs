//! Suggestion extraction
//!
//! Turns a chat exchange into zero or more structured task candidates. The
//! extractor is a pure function of its inputs plus the clock: given the same
//! text and a frozen clock the output is reproducible except for generated
//! ids. Rule data lives in [`rules`].

use chrono::{DateTime, Utc};
use tracing::debug;

use taskboard::{Creator, Task};

pub mod rules;

/// Tag applied to every extracted candidate
pub const AI_GENERATED_TAG: &str = "ai-generated";

/// Extract task candidates from a chat exchange
///
/// Returns an empty vec unless the user message signals task-creation intent
/// or the assistant reply suggests a task. Tolerates empty assistant text.
pub fn extract(user_message: &str, assistant_text: &str) -> Vec<Task> {
    extract_at(user_message, assistant_text, Utc::now())
}

/// Clock-injected variant of [`extract`] for deterministic tests
pub fn extract_at(user_message: &str, assistant_text: &str, now: DateTime<Utc>) -> Vec<Task> {
    if !rules::has_task_intent(user_message) && !rules::suggests_task(assistant_text) {
        debug!("extract_at: no trigger phrases, no candidates");
        return Vec::new();
    }

    let title = rules::derive_title(user_message);
    let priority = rules::infer_priority(user_message);
    let field = rules::infer_field(user_message);
    let deadline = rules::infer_deadline(user_message, now);

    debug!(%title, %priority, field, "extract_at: emitting candidate");

    let task = Task::new(title)
        .with_description(user_message)
        .with_priority(priority)
        .with_created_by(Creator::Bot)
        .with_created_at(now)
        .with_tag(AI_GENERATED_TAG)
        .with_deadline(deadline)
        .with_field(field);

    vec![task]
}
