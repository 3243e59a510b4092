use crate::text_matcher::TextMatcher;
use crate::{Category, Priority, Task};

/// Predicate matching tasks with the given priority.
pub fn by_priority(priority: Priority) -> impl Fn(&Task) -> bool {
    move |task| task.priority == priority
}

/// Predicate matching tasks filed under the given category.
pub fn by_category(category: Category) -> impl Fn(&Task) -> bool {
    move |task| task.category == category
}

/// Active list filters. Every set clause must match (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Required priority.
    pub priority: Option<Priority>,
    /// Required category.
    pub category: Option<Category>,
    /// Search text over title and description.
    pub text: Option<TextMatcher>,
}

impl TaskFilter {
    /// Start building a filter.
    #[must_use]
    pub fn builder() -> TaskFilterBuilder {
        TaskFilterBuilder::new()
    }

    /// Returns true when no clause is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.priority.is_none() && self.category.is_none() && self.text.is_none()
    }

    /// Evaluate all clauses against a task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.priority.is_none_or(|p| by_priority(p)(task))
            && self.category.is_none_or(|c| by_category(c)(task))
            && self.text.as_ref().is_none_or(|matcher| matcher.matches(task))
    }

    /// Keep only the tasks that match, preserving order.
    pub fn apply<'a, I>(&'a self, tasks: I) -> impl Iterator<Item = &'a Task> + 'a
    where
        I: IntoIterator<Item = &'a Task>,
        I::IntoIter: 'a,
    {
        tasks.into_iter().filter(move |task| self.matches(task))
    }
}

/// Builder for [`TaskFilter`].
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    filter: TaskFilter,
}

impl TaskFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a priority.
    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.filter.priority = Some(priority);
        self
    }

    /// Require a category.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.filter.category = Some(category);
        self
    }

    /// Search text; blank queries leave the clause unset.
    #[must_use]
    pub fn text(mut self, query: impl AsRef<str>) -> Self {
        self.filter.text = TextMatcher::new(query.as_ref());
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> TaskFilter {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewTask, TaskId};
    use time::OffsetDateTime;

    fn task(title: &str, priority: Priority, category: Category) -> Task {
        let mut draft = NewTask::titled(title);
        draft.priority = priority;
        draft.category = category;
        draft
            .into_task(TaskId::new(), OffsetDateTime::UNIX_EPOCH)
            .unwrap_or_else(|| panic!("title {title} must build"))
    }

    fn sample() -> Vec<Task> {
        vec![
            task("deploy", Priority::High, Category::Work),
            task("groceries", Priority::High, Category::Shopping),
            task("standup notes", Priority::Low, Category::Work),
            task("call mom", Priority::None, Category::Personal),
        ]
    }

    fn titles<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<&'a str> {
        tasks.map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn single_field_predicates() {
        let tasks = sample();
        assert_eq!(
            titles(tasks.iter().filter(|t| by_priority(Priority::High)(*t))),
            vec!["deploy", "groceries"]
        );
        assert_eq!(
            titles(tasks.iter().filter(|t| by_category(Category::Work)(*t))),
            vec!["deploy", "standup notes"]
        );
    }

    #[test]
    fn empty_filter_matches_everything() {
        let tasks = sample();
        let filter = TaskFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&tasks).count(), tasks.len());
    }

    #[test]
    fn clauses_compose_with_and() {
        let tasks = sample();
        let filter = TaskFilter::builder()
            .priority(Priority::High)
            .category(Category::Work)
            .build();
        assert_eq!(titles(filter.apply(&tasks)), vec!["deploy"]);

        let filter = TaskFilter::builder()
            .category(Category::Work)
            .text("NOTES")
            .build();
        assert_eq!(titles(filter.apply(&tasks)), vec!["standup notes"]);
    }

    #[test]
    fn blank_text_leaves_clause_unset() {
        let filter = TaskFilter::builder().text("   ").build();
        assert!(filter.text.is_none());
        assert!(filter.is_empty());
    }
}
