use time::{Duration, OffsetDateTime};

use crate::Task;

/// Hides completed tasks from derived views once they have been done for a
/// while. Archived tasks stay in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchivePolicy {
    /// Whether hiding is active at all.
    pub enabled: bool,
    /// Time a task must stay completed before it is hidden.
    pub after: Duration,
}

impl Default for ArchivePolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            after: Self::DEFAULT_AFTER,
        }
    }
}

impl ArchivePolicy {
    /// Threshold used when none is configured.
    pub const DEFAULT_AFTER: Duration = Duration::hours(24);

    /// Policy that hides tasks completed at least `after` ago.
    #[must_use]
    pub const fn after(after: Duration) -> Self {
        Self {
            enabled: true,
            after,
        }
    }

    /// Returns true if the task should be hidden at `now`.
    #[must_use]
    pub fn is_archived(&self, task: &Task, now: OffsetDateTime) -> bool {
        if !self.enabled || !task.completed {
            return false;
        }
        task.completed_at
            .is_some_and(|completed_at| now - completed_at >= self.after)
    }

    /// Tasks still visible at `now`, in input order.
    pub fn visible<'a, I>(&self, tasks: I, now: OffsetDateTime) -> impl Iterator<Item = &'a Task> + use<'a, I>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let policy = *self;
        tasks
            .into_iter()
            .filter(move |task| !policy.is_archived(task, now))
    }
}
