use std::{fmt, str::FromStr};

use taskdeck_core::{
    ArchivePolicy, CalendarCursor, Category, ClockTime, DayCell, MonthGrid, NewTask, Priority,
    Task, TaskEdit, TaskFilter, TaskId, TaskStore, sort_for_list,
};
use thiserror::Error;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use crate::config::{DefaultView, Settings};

/// Navigation entries of the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarView {
    /// Every task, sorted for the list.
    #[default]
    MyTasks,
    /// Starred tasks only.
    Starred,
    /// Month calendar.
    Calendar,
}

impl SidebarView {
    /// String representation used by the shell.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MyTasks => "tasks",
            Self::Starred => "starred",
            Self::Calendar => "calendar",
        }
    }
}

impl From<DefaultView> for SidebarView {
    fn from(view: DefaultView) -> Self {
        match view {
            DefaultView::List => Self::MyTasks,
            DefaultView::Calendar => Self::Calendar,
        }
    }
}

impl fmt::Display for SidebarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown sidebar view name.
#[derive(Debug, Error)]
#[error("unknown view '{0}' (expected tasks, starred or calendar)")]
pub struct UnknownView(String);

impl FromStr for SidebarView {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tasks" | "my-tasks" | "list" => Ok(Self::MyTasks),
            "starred" => Ok(Self::Starred),
            "calendar" => Ok(Self::Calendar),
            _ => Err(UnknownView(s.to_owned())),
        }
    }
}

/// Badge counts shown next to the sidebar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SidebarCounts {
    /// Open tasks.
    pub my_tasks: usize,
    /// Open starred tasks.
    pub starred: usize,
}

/// One user session: the task store plus everything the views need.
#[derive(Debug, Clone)]
pub struct Session {
    store: TaskStore,
    settings: Settings,
    archive: ArchivePolicy,
    view: SidebarView,
    filter: TaskFilter,
    cursor: CalendarCursor,
}

impl Session {
    /// Start an empty session with the configured default view and the
    /// calendar focused on `today`.
    #[must_use]
    pub fn new(settings: Settings, today: Date) -> Self {
        let view = SidebarView::from(settings.appearance.default_view);
        let archive = settings.archive_policy();
        info!(%view, auto_archive = archive.enabled, "Session started");
        Self {
            store: TaskStore::new(),
            settings,
            archive,
            view,
            filter: TaskFilter::default(),
            cursor: CalendarCursor::new(today),
        }
    }

    /// Underlying task store, in store order.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Settings the session was started with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Active sidebar view.
    #[must_use]
    pub const fn view(&self) -> SidebarView {
        self.view
    }

    /// Switch the sidebar view.
    pub fn set_view(&mut self, view: SidebarView) {
        debug!(%view, "Switched view");
        self.view = view;
    }

    /// Active filter.
    #[must_use]
    pub const fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Replace the active filter.
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    /// Drop every filter clause.
    pub fn clear_filter(&mut self) {
        self.filter = TaskFilter::default();
    }

    /// Calendar focus.
    #[must_use]
    pub const fn cursor(&self) -> CalendarCursor {
        self.cursor
    }

    /// Add a task from the full task form.
    pub fn add_task(&mut self, draft: NewTask, now: OffsetDateTime) -> Option<TaskId> {
        self.store.add_at(draft, now)
    }

    /// Add a task from a calendar day cell.
    pub fn quick_add(
        &mut self,
        title: impl Into<String>,
        day: Date,
        priority: Priority,
        category: Category,
        time: Option<ClockTime>,
        now: OffsetDateTime,
    ) -> Option<TaskId> {
        self.store
            .add_at(NewTask::quick(title, day, priority, category, time), now)
    }

    /// Save a whole task record from the edit dialog. Completion time is
    /// stamped with `now` when the record completes the task.
    pub fn update_task(&mut self, task: Task, now: OffsetDateTime) {
        self.store.update_at(task, now);
    }

    /// Apply field edits in order.
    pub fn edit_task(&mut self, id: TaskId, edits: impl IntoIterator<Item = TaskEdit>) {
        for edit in edits {
            self.store.edit(id, edit);
        }
    }

    /// Remove a task.
    pub fn delete_task(&mut self, id: TaskId) {
        self.store.delete(id);
    }

    /// Complete or reopen a task.
    pub fn toggle_completed(&mut self, id: TaskId, now: OffsetDateTime) {
        self.store.toggle_completed_at(id, now);
    }

    /// Star or unstar a task.
    pub fn toggle_starred(&mut self, id: TaskId) {
        self.store.toggle_starred(id);
    }

    /// Move `from` to the store position of `to`.
    pub fn reorder(&mut self, from: TaskId, to: TaskId) {
        self.store.reorder(from, to);
    }

    /// Focus the calendar on `today`.
    pub const fn go_to_today(&mut self, today: Date) {
        self.cursor.today(today);
    }

    /// Focus the same day next month.
    pub fn next_month(&mut self) {
        self.cursor.next_month();
    }

    /// Focus the same day last month.
    pub fn prev_month(&mut self) {
        self.cursor.prev_month();
    }

    /// Focus the next day.
    pub fn next_day(&mut self) {
        self.cursor.next_day();
    }

    /// Focus the previous day.
    pub fn prev_day(&mut self) {
        self.cursor.prev_day();
    }

    /// Tasks visible in the list for the active view, sorted for display.
    #[must_use]
    pub fn list_view(&self, now: OffsetDateTime) -> Vec<&Task> {
        let starred_only = self.view == SidebarView::Starred;
        sort_for_list(self.visible(now, starred_only))
    }

    /// Grid of the focused month.
    #[must_use]
    pub fn month_grid(&self) -> Option<MonthGrid> {
        self.cursor.grid()
    }

    /// Day cells of the focused month with the filtered tasks due each day.
    #[must_use]
    pub fn calendar_cells(&self, now: OffsetDateTime) -> Vec<DayCell<'_>> {
        self.month_grid()
            .map(|grid| grid.cells(self.visible(now, false), now.date()))
            .unwrap_or_default()
    }

    /// Badge counts; archived tasks are not counted.
    #[must_use]
    pub fn counts(&self, now: OffsetDateTime) -> SidebarCounts {
        self.archive
            .visible(self.store.tasks(), now)
            .filter(|task| !task.completed)
            .fold(SidebarCounts::default(), |mut counts, task| {
                counts.my_tasks += 1;
                if task.starred {
                    counts.starred += 1;
                }
                counts
            })
    }

    fn visible(&self, now: OffsetDateTime, starred_only: bool) -> impl Iterator<Item = &Task> {
        let filter = &self.filter;
        self.archive
            .visible(self.store.tasks(), now)
            .filter(move |task| !starred_only || task.starred)
            .filter(move |task| filter.matches(task))
    }
}
