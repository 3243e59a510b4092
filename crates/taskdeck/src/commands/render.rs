use std::io::{self, Write};

use taskdeck_app::Settings;
use taskdeck_core::{DayCell, MonthGrid, Task};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn task_table<W: Write>(out: &mut W, tasks: &[&Task]) -> io::Result<()> {
    writeln!(out, "# | Done | Star | Priority | Category | Due | Time | Title")?;
    writeln!(out, "- | ---- | ---- | -------- | -------- | --- | ---- | -----")?;

    for (row, task) in tasks.iter().enumerate() {
        let due = task.due_date.map_or_else(|| "-".to_owned(), |date| date.to_string());
        writeln!(
            out,
            "{} | {} | {} | {} | {} | {} | {} | {}",
            row + 1,
            if task.completed { "x" } else { " " },
            if task.starred { "*" } else { " " },
            task.priority,
            task.category,
            due,
            time_slot(task),
            task.title
        )?;
    }
    Ok(())
}

/// Month header, a week grid, then the tasks of each day that has any.
///
/// Days outside the month are shown in parentheses and today in brackets.
pub fn calendar<W: Write>(out: &mut W, grid: &MonthGrid, cells: &[DayCell<'_>]) -> io::Result<()> {
    writeln!(out, "{} {}", grid.month(), grid.year())?;
    writeln!(out, "{}", WEEKDAYS.map(|day| format!("{day:<4}")).join(" ").trim_end())?;
    for week in cells.chunks(7) {
        let line: Vec<String> = week.iter().map(day_token).collect();
        writeln!(out, "{}", line.join(" "))?;
    }

    for cell in cells.iter().filter(|cell| !cell.tasks.is_empty()) {
        writeln!(out)?;
        writeln!(out, "{} {}", cell.date, cell.date.weekday())?;
        for task in cell.visible() {
            let done = if task.completed { "[x]" } else { "[ ]" };
            match task.start_time {
                Some(start) => writeln!(out, "  {done} {start} {}", task.title)?,
                None => writeln!(out, "  {done} {}", task.title)?,
            }
        }
        if cell.overflow() > 0 {
            writeln!(out, "  +{} more", cell.overflow())?;
        }
    }
    Ok(())
}

pub fn settings<W: Write>(out: &mut W, settings: &Settings) -> io::Result<()> {
    let Settings {
        appearance,
        notifications,
        tasks,
    } = settings;
    writeln!(out, "appearance.dark_mode = {}", appearance.dark_mode)?;
    writeln!(out, "appearance.default_view = {}", appearance.default_view)?;
    writeln!(out, "notifications.enabled = {}", notifications.enabled)?;
    writeln!(out, "notifications.task_reminders = {}", notifications.task_reminders)?;
    writeln!(out, "tasks.auto_archive = {}", tasks.auto_archive)?;
    writeln!(out, "tasks.archive_after_hours = {}", tasks.archive_after_hours)
}

fn day_token(cell: &DayCell<'_>) -> String {
    let day = cell.date.day();
    if cell.is_today {
        format!("[{day:>2}]")
    } else if cell.in_month {
        format!(" {day:>2} ")
    } else {
        format!("({day:>2})")
    }
}

fn time_slot(task: &Task) -> String {
    match (task.start_time, task.end_time) {
        (Some(start), Some(end)) => format!("{start}-{end}"),
        (Some(start), None) => start.to_string(),
        (None, Some(end)) => format!("-{end}"),
        (None, None) => "-".to_owned(),
    }
}
