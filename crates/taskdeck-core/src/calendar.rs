use std::collections::BTreeMap;
use std::iter;

use time::{Date, Duration, Month};

use crate::Task;

/// Tasks rendered inside one day cell before collapsing the rest into a count.
pub const MAX_TASKS_PER_CELL: usize = 3;

/// The visible days of a calendar month: whole weeks from the Sunday on or
/// before the 1st to the Saturday on or after the last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month: Month,
    start: Date,
    end: Date,
}

impl MonthGrid {
    /// Grid for the given month. Returns `None` only at the edges of the
    /// supported date range.
    #[must_use]
    pub fn new(year: i32, month: Month) -> Option<Self> {
        let first = Date::from_calendar_date(year, month, 1).ok()?;
        let last = last_day_of_month(year, month)?;
        let lead = i64::from(first.weekday().number_days_from_sunday());
        let trail = 6 - i64::from(last.weekday().number_days_from_sunday());
        Some(Self {
            year,
            month,
            start: first.checked_sub(Duration::days(lead))?,
            end: last.checked_add(Duration::days(trail))?,
        })
    }

    /// Grid for the month containing `date`.
    #[must_use]
    pub fn containing(date: Date) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    /// Year of the displayed month.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Displayed month.
    #[must_use]
    pub const fn month(&self) -> Month {
        self.month
    }

    /// First (Sunday) cell.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Last (Saturday) cell.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Number of cells; always a multiple of seven between 28 and 42.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from((self.end - self.start).whole_days() + 1).unwrap_or(0)
    }

    /// Grids always hold at least four weeks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns true when `date` is one of the grid's cells.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns true when `date` belongs to the displayed month rather than
    /// the leading or trailing days of the neighbours.
    #[must_use]
    pub fn in_month(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Every cell date in order.
    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end = self.end;
        iter::successors(Some(self.start), |day| day.next_day()).take_while(move |day| *day <= end)
    }

    /// Build one cell per grid day with the tasks due that day.
    #[must_use]
    pub fn cells<'a, I>(&self, tasks: I, today: Date) -> Vec<DayCell<'a>>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut buckets = bucket_by_day(tasks, self);
        self.days()
            .map(|date| DayCell {
                date,
                in_month: self.in_month(date),
                is_today: date == today,
                tasks: buckets.remove(&date).unwrap_or_default(),
            })
            .collect()
    }
}

/// Group tasks by due date, keeping only days inside the grid. Tasks keep
/// their input order inside each bucket; undated tasks are dropped.
#[must_use]
pub fn bucket_by_day<'a, I>(tasks: I, grid: &MonthGrid) -> BTreeMap<Date, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut buckets: BTreeMap<Date, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(due) = task.due_date
            && grid.contains(due)
        {
            buckets.entry(due).or_default().push(task);
        }
    }
    buckets
}

/// One day of the month grid.
#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    /// Calendar day.
    pub date: Date,
    /// False for leading/trailing days of adjacent months.
    pub in_month: bool,
    /// True for the current day.
    pub is_today: bool,
    /// All tasks due that day.
    pub tasks: Vec<&'a Task>,
}

impl<'a> DayCell<'a> {
    /// Tasks shown in the cell.
    #[must_use]
    pub fn visible(&self) -> &[&'a Task] {
        &self.tasks[..self.tasks.len().min(MAX_TASKS_PER_CELL)]
    }

    /// Tasks hidden behind the "+N more" marker.
    #[must_use]
    pub fn overflow(&self) -> usize {
        self.tasks.len().saturating_sub(MAX_TASKS_PER_CELL)
    }
}

/// Focused date of the calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    date: Date,
}

impl CalendarCursor {
    /// Cursor focused on `date`.
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self { date }
    }

    /// Focused date.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.date
    }

    /// Jump back to `today`.
    pub const fn today(&mut self, today: Date) {
        self.date = today;
    }

    /// Same day next month, clamped to the month's length (Jan 31 -> Feb 28).
    pub fn next_month(&mut self) {
        if let Some(date) = shift_month(self.date, true) {
            self.date = date;
        }
    }

    /// Same day previous month, clamped to the month's length.
    pub fn prev_month(&mut self) {
        if let Some(date) = shift_month(self.date, false) {
            self.date = date;
        }
    }

    /// Advance one day.
    pub fn next_day(&mut self) {
        if let Some(date) = self.date.next_day() {
            self.date = date;
        }
    }

    /// Go back one day.
    pub fn prev_day(&mut self) {
        if let Some(date) = self.date.previous_day() {
            self.date = date;
        }
    }

    /// Grid of the focused month.
    #[must_use]
    pub fn grid(&self) -> Option<MonthGrid> {
        MonthGrid::containing(self.date)
    }
}

fn shift_month(date: Date, forward: bool) -> Option<Date> {
    let (year, month) = match (forward, date.month()) {
        (true, Month::December) => (date.year() + 1, Month::January),
        (true, month) => (date.year(), month.next()),
        (false, Month::January) => (date.year() - 1, Month::December),
        (false, month) => (date.year(), month.previous()),
    };
    let last = last_day_of_month(year, month)?;
    Date::from_calendar_date(year, month, date.day().min(last.day())).ok()
}

fn last_day_of_month(year: i32, month: Month) -> Option<Date> {
    let next_first = match month {
        Month::December => Date::from_calendar_date(year + 1, Month::January, 1),
        other => Date::from_calendar_date(year, other.next(), 1),
    };
    next_first.ok()?.previous_day()
}
