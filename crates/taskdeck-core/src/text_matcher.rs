use crate::Task;

/// Case-insensitive substring matcher for the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Normalized query.
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Returns true if the title or description contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title) || self.matches_field(&task.description)
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewTask, TaskId};
    use time::OffsetDateTime;

    fn task(title: &str, description: &str) -> Task {
        let mut draft = NewTask::titled(title);
        draft.description = description.into();
        draft
            .into_task(TaskId::new(), OffsetDateTime::UNIX_EPOCH)
            .unwrap_or_else(|| panic!("title {title} must build"))
    }

    #[test]
    fn matcher_skips_blank_queries() {
        assert!(TextMatcher::new("").is_none());
        assert!(TextMatcher::new("   ").is_none());
        assert!(TextMatcher::new("\n").is_none());
    }

    #[test]
    fn matcher_searches_title_and_description() {
        let task = task("Quarterly Review", "Prepare slides for Friday");

        let matcher = TextMatcher::new("review")
            .unwrap_or_else(|| panic!("matcher must exist for queries with content"));
        assert!(matcher.matches(&task));

        let matcher = TextMatcher::new(" SLIDES ")
            .unwrap_or_else(|| panic!("matcher must exist for queries with content"));
        assert_eq!(matcher.needle(), "slides");
        assert!(matcher.matches(&task));

        let missing = TextMatcher::new("budget")
            .unwrap_or_else(|| panic!("matcher must exist for queries with content"));
        assert!(!missing.matches(&task));
    }
}
