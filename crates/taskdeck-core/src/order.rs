use std::cmp::Ordering;

use crate::Task;

/// Order two tasks for the list view.
///
/// Incomplete tasks come first, then higher priority, then tasks with a due
/// date (earliest first) ahead of undated ones. Undated tasks fall back to
/// newest creation first.
#[must_use]
pub fn compare_for_list(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.created_at.cmp(&a.created_at),
        })
}

/// Sort tasks for display. The sort is stable, so full ties keep input order.
#[must_use]
pub fn sort_for_list<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut ordered: Vec<&Task> = tasks.into_iter().collect();
    ordered.sort_by(|a, b| compare_for_list(a, b));
    ordered
}
