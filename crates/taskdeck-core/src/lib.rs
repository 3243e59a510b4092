//! Domain types, the in-memory task store and derived views for taskdeck.

/// Auto-archive policy.
pub mod archive;
/// Month grid, day buckets and calendar navigation.
pub mod calendar;
/// Parse errors.
pub mod error;
/// Field value types (priority, category, clock time).
pub mod fields;
/// Task filters.
pub mod filter;
pub mod id;
/// List view ordering.
pub mod order;
/// The ordered task collection.
pub mod store;
/// Case-insensitive text search.
pub mod text_matcher;

pub use crate::archive::ArchivePolicy;
pub use crate::calendar::{CalendarCursor, DayCell, MAX_TASKS_PER_CELL, MonthGrid, bucket_by_day};
pub use crate::error::ParseError;
pub use crate::fields::{Category, ClockTime, Priority, parse_date};
pub use crate::filter::{TaskFilter, TaskFilterBuilder, by_category, by_priority};
pub use crate::id::TaskId;
pub use crate::order::{compare_for_list, sort_for_list};
pub use crate::store::TaskStore;
pub use crate::text_matcher::TextMatcher;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A single to-do item with scheduling and classification metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier of the task.
    pub id: TaskId,
    /// Display title, never blank.
    pub title: String,
    /// Free-form notes.
    #[serde(default)]
    pub description: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Filing category.
    #[serde(default)]
    pub category: Category,
    /// Calendar day the task is due.
    #[serde(default, with = "iso_date::option")]
    pub due_date: Option<Date>,
    /// Start of the time slot.
    #[serde(default)]
    pub start_time: Option<ClockTime>,
    /// End of the time slot.
    #[serde(default)]
    pub end_time: Option<ClockTime>,
    /// Shown in the Starred view.
    #[serde(default)]
    pub starred: bool,
    /// Creation timestamp; immutable.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the task was last marked completed.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

impl Task {
    /// Apply a single field edit. Returns false (and leaves the task untouched)
    /// when the edit would blank out the title.
    pub fn apply(&mut self, edit: TaskEdit) -> bool {
        match edit {
            TaskEdit::Title(title) => {
                let trimmed = title.trim();
                if trimmed.is_empty() {
                    return false;
                }
                self.title = trimmed.to_owned();
            }
            TaskEdit::Description(description) => self.description = description,
            TaskEdit::Priority(priority) => self.priority = priority,
            TaskEdit::Category(category) => self.category = category,
            TaskEdit::DueDate(due_date) => self.due_date = due_date,
            TaskEdit::StartTime(start_time) => self.start_time = start_time,
            TaskEdit::EndTime(end_time) => self.end_time = end_time,
            TaskEdit::Starred(starred) => self.starred = starred,
        }
        true
    }
}

/// Fields supplied when creating a task; the store assigns id and creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    /// Title (trimmed on insert; blank titles are rejected).
    pub title: String,
    /// Free-form notes.
    pub description: String,
    /// Urgency.
    pub priority: Priority,
    /// Filing category.
    pub category: Category,
    /// Calendar day the task is due.
    pub due_date: Option<Date>,
    /// Start of the time slot.
    pub start_time: Option<ClockTime>,
    /// End of the time slot.
    pub end_time: Option<ClockTime>,
    /// Initially starred.
    pub starred: bool,
}

impl NewTask {
    /// Start a draft with the given title and default fields.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Draft created from a calendar day cell: the day is the due date and the
    /// optional time becomes the start of the slot.
    #[must_use]
    pub fn quick(
        title: impl Into<String>,
        due_date: Date,
        priority: Priority,
        category: Category,
        time: Option<ClockTime>,
    ) -> Self {
        Self {
            title: title.into(),
            priority,
            category,
            due_date: Some(due_date),
            start_time: time,
            ..Self::default()
        }
    }

    /// Returns true when the trimmed title is non-empty.
    #[must_use]
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Materialize the draft. Returns `None` for blank titles.
    #[must_use]
    pub fn into_task(self, id: TaskId, created_at: OffsetDateTime) -> Option<Task> {
        if !self.has_title() {
            return None;
        }
        Some(Task {
            id,
            title: self.title.trim().to_owned(),
            description: self.description,
            completed: false,
            priority: self.priority,
            category: self.category,
            due_date: self.due_date,
            start_time: self.start_time,
            end_time: self.end_time,
            starred: self.starred,
            created_at,
            completed_at: None,
        })
    }
}

/// One field change from the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEdit {
    /// Replace the title (blank values are rejected).
    Title(String),
    /// Replace the description.
    Description(String),
    /// Set the priority.
    Priority(Priority),
    /// Set the category.
    Category(Category),
    /// Set or clear the due date.
    DueDate(Option<Date>),
    /// Set or clear the start time.
    StartTime(Option<ClockTime>),
    /// Set or clear the end time.
    EndTime(Option<ClockTime>),
    /// Star or unstar.
    Starred(bool),
}
