use time::OffsetDateTime;
use tracing::debug;

use crate::id::TaskId;
use crate::{NewTask, Task, TaskEdit};

/// Ordered, in-memory collection of tasks for one session.
///
/// Index 0 is the most recently added task. Every mutation is infallible: an
/// unknown id or a blank title turns the call into a no-op.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Insert a new task at the front, stamped with the current time.
    pub fn add(&mut self, draft: NewTask) -> Option<TaskId> {
        self.add_at(draft, OffsetDateTime::now_utc())
    }

    /// Insert a new task at the front using an explicit creation time.
    pub fn add_at(&mut self, draft: NewTask, now: OffsetDateTime) -> Option<TaskId> {
        let Some(task) = draft.into_task(TaskId::new(), now) else {
            debug!("Ignoring task with blank title");
            return None;
        };
        let id = task.id;
        self.tasks.insert(0, task);
        debug!(task = %id, "Added task");
        Some(id)
    }

    /// Replace the stored task with the same id. The stored creation time is kept.
    pub fn update(&mut self, task: Task) {
        self.update_at(task, OffsetDateTime::now_utc());
    }

    /// Replace the stored task using an explicit clock.
    ///
    /// `completed_at` is owned by the store: it is kept while the completion
    /// flag is unchanged, stamped with `now` when the record completes the
    /// task and cleared when it reopens it.
    pub fn update_at(&mut self, task: Task, now: OffsetDateTime) {
        if task.title.trim().is_empty() {
            debug!(task = %task.id, "Ignoring update with blank title");
            return;
        }
        let Some(slot) = self.get_mut(task.id) else {
            debug!(task = %task.id, "Ignoring update for unknown task");
            return;
        };
        let created_at = slot.created_at;
        let completed_at = match (slot.completed, task.completed) {
            (false, true) => Some(now),
            (_, false) => None,
            (true, true) => slot.completed_at.or(Some(now)),
        };
        *slot = Task {
            title: task.title.trim().to_owned(),
            created_at,
            completed_at,
            ..task
        };
    }

    /// Apply a single field edit to the task with the given id.
    pub fn edit(&mut self, id: TaskId, edit: TaskEdit) {
        let Some(task) = self.get_mut(id) else {
            debug!(task = %id, "Ignoring edit for unknown task");
            return;
        };
        if !task.apply(edit) {
            debug!(task = %id, "Ignoring edit with blank title");
        }
    }

    /// Remove the task with the given id.
    pub fn delete(&mut self, id: TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!(task = %id, "Ignoring delete for unknown task");
        }
    }

    /// Flip the completion flag, stamping the current time when completing.
    pub fn toggle_completed(&mut self, id: TaskId) {
        self.toggle_completed_at(id, OffsetDateTime::now_utc());
    }

    /// Flip the completion flag using an explicit clock.
    pub fn toggle_completed_at(&mut self, id: TaskId, now: OffsetDateTime) {
        let Some(task) = self.get_mut(id) else {
            debug!(task = %id, "Ignoring toggle for unknown task");
            return;
        };
        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);
    }

    /// Flip the starred flag.
    pub fn toggle_starred(&mut self, id: TaskId) {
        if let Some(task) = self.get_mut(id) {
            task.starred = !task.starred;
        } else {
            debug!(task = %id, "Ignoring star for unknown task");
        }
    }

    /// Move `from` to the index currently held by `to`, shifting the tasks in
    /// between by one and leaving every other task where it was.
    pub fn reorder(&mut self, from: TaskId, to: TaskId) {
        if from == to {
            return;
        }
        let (Some(from_idx), Some(to_idx)) = (self.position(from), self.position(to)) else {
            debug!(%from, %to, "Ignoring reorder with unknown task");
            return;
        };
        let task = self.tasks.remove(from_idx);
        self.tasks.insert(to_idx, task);
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Index of the task in store order.
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// All tasks in store order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Iterate tasks in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true when the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Priority, TaskEdit};
    use time::Duration;
    use time::macros::datetime;

    fn store_with(titles: &[&str]) -> (TaskStore, Vec<TaskId>) {
        let mut store = TaskStore::new();
        let mut ids = Vec::new();
        for title in titles {
            let id = store
                .add(NewTask::titled(*title))
                .unwrap_or_else(|| panic!("title {title} must be accepted"));
            ids.push(id);
        }
        (store, ids)
    }

    fn ids(store: &TaskStore) -> Vec<TaskId> {
        store.iter().map(|task| task.id).collect()
    }

    #[test]
    fn add_places_task_first() {
        let (mut store, _) = store_with(&["first", "second"]);
        let before = store.len();
        let id = store
            .add(NewTask::titled("third"))
            .unwrap_or_else(|| panic!("must insert"));
        assert_eq!(store.len(), before + 1);
        assert_eq!(store.tasks()[0].id, id);
        assert_eq!(store.tasks()[0].title, "third");
    }

    #[test]
    fn add_blank_title_is_noop() {
        let (mut store, _) = store_with(&["only"]);
        assert!(store.add(NewTask::titled("")).is_none());
        assert!(store.add(NewTask::titled("   \t")).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_replaces_fields_but_keeps_created_at() {
        let mut store = TaskStore::new();
        let id = store
            .add_at(NewTask::titled("draft"), datetime!(2025-01-01 00:00 UTC))
            .unwrap_or_else(|| panic!("must insert"));
        let mut edited = store.get(id).cloned().unwrap_or_else(|| panic!("task exists"));
        edited.title = "final".into();
        edited.priority = Priority::High;
        edited.created_at = datetime!(2030-01-01 00:00 UTC);
        store.update(edited);

        let stored = store.get(id).unwrap_or_else(|| panic!("task exists"));
        assert_eq!(stored.title, "final");
        assert_eq!(stored.priority, Priority::High);
        assert_eq!(stored.created_at, datetime!(2025-01-01 00:00 UTC));
    }

    #[test]
    fn update_owns_completion_timestamp() {
        let mut store = TaskStore::new();
        let t0 = datetime!(2025-01-01 09:00 UTC);
        let id = store
            .add_at(NewTask::titled("report"), t0)
            .unwrap_or_else(|| panic!("must insert"));
        let stale = store.get(id).cloned().unwrap_or_else(|| panic!("task exists"));

        // Completing through a full record stamps the update time.
        let mut done = stale.clone();
        done.completed = true;
        done.completed_at = None;
        store.update_at(done, t0 + Duration::hours(1));
        let stored = store.get(id).unwrap_or_else(|| panic!("task exists"));
        assert!(stored.completed);
        assert_eq!(stored.completed_at, Some(t0 + Duration::hours(1)));

        // A completed record keeps the original stamp, whatever the caller sent.
        let mut renamed = stored.clone();
        renamed.title = "final report".into();
        renamed.completed_at = Some(t0 + Duration::days(9));
        store.update_at(renamed, t0 + Duration::hours(2));
        let stored = store.get(id).unwrap_or_else(|| panic!("task exists"));
        assert_eq!(stored.title, "final report");
        assert_eq!(stored.completed_at, Some(t0 + Duration::hours(1)));

        // An open record reopens the task and clears the stamp.
        store.update_at(stale, t0 + Duration::hours(3));
        let stored = store.get(id).unwrap_or_else(|| panic!("task exists"));
        assert!(!stored.completed);
        assert_eq!(stored.completed_at, None);
    }

    #[test]
    fn toggled_task_survives_update_with_completed_flag() {
        let mut store = TaskStore::new();
        let t0 = datetime!(2025-01-01 09:00 UTC);
        let id = store
            .add_at(NewTask::titled("taxes"), t0)
            .unwrap_or_else(|| panic!("must insert"));
        store.toggle_completed_at(id, t0);

        let mut edited = store.get(id).cloned().unwrap_or_else(|| panic!("task exists"));
        edited.completed_at = None;
        edited.priority = Priority::High;
        store.update_at(edited, t0 + Duration::days(1));

        let stored = store.get(id).unwrap_or_else(|| panic!("task exists"));
        assert!(stored.completed);
        assert_eq!(stored.completed_at, Some(t0));
        assert_eq!(stored.priority, Priority::High);
    }

    #[test]
    fn update_unknown_or_blank_is_noop() {
        let (mut store, ids) = store_with(&["keep"]);
        let mut stranger = store.tasks()[0].clone();
        stranger.id = TaskId::new();
        stranger.title = "stranger".into();
        store.update(stranger);

        let mut blank = store.tasks()[0].clone();
        blank.title = "  ".into();
        store.update(blank);

        assert_eq!(store.len(), 1);
        let kept = store.get(ids[0]).unwrap_or_else(|| panic!("task exists"));
        assert_eq!(kept.title, "keep");
    }

    #[test]
    fn edit_applies_single_field() {
        let (mut store, ids) = store_with(&["task"]);
        store.edit(ids[0], TaskEdit::Priority(Priority::Medium));
        store.edit(ids[0], TaskEdit::Title(String::new()));
        store.edit(TaskId::new(), TaskEdit::Starred(true));
        let task = store.get(ids[0]).unwrap_or_else(|| panic!("task exists"));
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.title, "task");
        assert!(!task.starred);
    }

    #[test]
    fn delete_removes_only_matching_task() {
        let (mut store, ids) = store_with(&["a", "b", "c"]);
        store.delete(ids[1]);
        store.delete(TaskId::new());
        assert_eq!(self::ids(&store), vec![ids[2], ids[0]]);
    }

    #[test]
    fn toggle_completed_twice_restores_state() {
        let (mut store, ids) = store_with(&["a"]);
        let now = datetime!(2025-03-01 12:00 UTC);
        store.toggle_completed_at(ids[0], now);
        let task = store.get(ids[0]).unwrap_or_else(|| panic!("task exists"));
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(now));

        store.toggle_completed_at(ids[0], now + Duration::hours(1));
        let task = store.get(ids[0]).unwrap_or_else(|| panic!("task exists"));
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn toggle_starred_flips_flag() {
        let (mut store, ids) = store_with(&["a"]);
        store.toggle_starred(ids[0]);
        assert!(store.get(ids[0]).is_some_and(|task| task.starred));
        store.toggle_starred(ids[0]);
        assert!(store.get(ids[0]).is_some_and(|task| !task.starred));
    }

    #[test]
    fn reorder_moves_forward_and_backward() {
        // Store order is reversed insertion order: [e, d, c, b, a].
        let (mut store, added) = store_with(&["a", "b", "c", "d", "e"]);
        let (a, b, c, d, e) = (added[0], added[1], added[2], added[3], added[4]);

        store.reorder(e, b);
        assert_eq!(ids(&store), vec![d, c, b, e, a]);

        store.reorder(a, d);
        assert_eq!(ids(&store), vec![a, d, c, b, e]);
    }

    #[test]
    fn reorder_preserves_ids_and_relative_order_of_others() {
        let (mut store, added) = store_with(&["a", "b", "c", "d", "e", "f"]);
        let original = ids(&store);
        let moved = added[1];
        store.reorder(moved, added[4]);

        let after = ids(&store);
        let mut sorted_before = original.clone();
        let mut sorted_after = after.clone();
        sorted_before.sort();
        sorted_after.sort();
        assert_eq!(sorted_before, sorted_after);

        let others_before: Vec<_> = original.iter().filter(|id| **id != moved).collect();
        let others_after: Vec<_> = after.iter().filter(|id| **id != moved).collect();
        assert_eq!(others_before, others_after);
        assert_eq!(store.position(moved), original.iter().position(|id| *id == added[4]));
    }

    #[test]
    fn reorder_noops() {
        let (mut store, added) = store_with(&["a", "b"]);
        let original = ids(&store);
        store.reorder(added[0], added[0]);
        store.reorder(added[0], TaskId::new());
        store.reorder(TaskId::new(), added[1]);
        assert_eq!(ids(&store), original);
    }
}
