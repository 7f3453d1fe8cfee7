//! Task id generation
//!
//! Task ids use the format `{6-char-hex}-task-{slug}`, e.g.
//! `019876-task-call-mom`. The hex prefix comes from a UUIDv7 so ids sort
//! roughly by creation time.

/// Generate a task id from a title
pub fn generate_task_id(title: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let hex_prefix = &uuid.to_string()[..6];
    format!("{}-task-{}", hex_prefix, slugify(title))
}

/// Slugify a title for use in ids
///
/// Lowercases, strips apostrophes (straight and curly), and collapses runs
/// of non-alphanumeric characters into single hyphens.
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_task_id() {
        let id = generate_task_id("Call mom about the weekend");
        assert!(id.len() > 10);
        assert!(id.contains("-task-"));
        assert!(id.ends_with("call-mom-about-the-weekend"));
    }

    #[test]
    fn test_generate_task_id_unique() {
        let a = generate_task_id("Same title");
        let b = generate_task_id("Same title");
        assert_ne!(a, b);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Ship v2!"), "ship-v2");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        // Apostrophes are stripped, not converted to hyphens
        assert_eq!(slugify("don't stop"), "dont-stop");
        assert_eq!(slugify("it\u{2019}s working"), "its-working");
    }

    proptest::proptest! {
        #[test]
        fn test_slugify_output_is_well_formed(title in ".{0,80}") {
            let slug = slugify(&title);
            proptest::prop_assert!(!slug.starts_with('-'));
            proptest::prop_assert!(!slug.ends_with('-'));
            proptest::prop_assert!(!slug.contains("--"));
        }
    }
}
