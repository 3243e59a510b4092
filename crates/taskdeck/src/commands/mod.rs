//! Line-oriented shell over a [`Session`].

use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, CommandFactory, Parser, Subcommand};
use taskdeck_app::{Session, SidebarView, TaskFilterBuilder, describe_filter};
use taskdeck_core::{
    Category, ClockTime, NewTask, ParseError, Priority, Task, TaskEdit, TaskId, parse_date,
};
use time::OffsetDateTime;
use tracing::{debug, warn};

mod render;

/// One shell line, parsed without a binary name.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    no_binary_name = true,
    disable_help_subcommand = true,
    override_usage = "<COMMAND> [ARGS]"
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ShellCommand {
    /// Create a task from the full form.
    Add(AddArgs),

    /// Create a task on a calendar day.
    Quick(QuickArgs),

    /// Change fields of a task. Use `none` to clear a date or time.
    Edit(EditArgs),

    /// Toggle the completed flag.
    Done { task: String },

    /// Toggle the starred flag.
    Star { task: String },

    /// Delete a task.
    #[command(alias = "delete")]
    Rm { task: String },

    /// Move a task to the position of another one.
    Move { from: String, to: String },

    /// List tasks of the active view, sorted.
    Ls,

    /// Print a task as JSON.
    Show { task: String },

    /// Show or switch the sidebar view (tasks, starred, calendar).
    View { name: Option<String> },

    /// Show, set or clear the active filter.
    Filter(FilterArgs),

    /// Render the focused month.
    Cal,

    /// Focus the calendar on today.
    Today,

    /// Focus the same day next month.
    NextMonth,

    /// Focus the same day last month.
    PrevMonth,

    /// Focus the next day.
    NextDay,

    /// Focus the previous day.
    PrevDay,

    /// Print the loaded settings.
    Settings,

    /// Print this help.
    Help,

    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

#[derive(Args, Debug, PartialEq, Eq)]
struct AddArgs {
    /// Title words.
    #[arg(required = true)]
    title: Vec<String>,
    #[arg(short = 'd', long)]
    description: Option<String>,
    #[arg(short = 'p', long)]
    priority: Option<String>,
    #[arg(short = 'c', long)]
    category: Option<String>,
    /// Due date, YYYY-MM-DD.
    #[arg(long)]
    due: Option<String>,
    /// Start time, HH:MM.
    #[arg(long)]
    start: Option<String>,
    /// End time, HH:MM.
    #[arg(long)]
    end: Option<String>,
    #[arg(long)]
    star: bool,
}

#[derive(Args, Debug, PartialEq, Eq)]
struct QuickArgs {
    /// Day, YYYY-MM-DD.
    date: String,
    /// Title words.
    #[arg(required = true)]
    title: Vec<String>,
    #[arg(short = 'p', long)]
    priority: Option<String>,
    #[arg(short = 'c', long)]
    category: Option<String>,
    /// Start time, HH:MM.
    #[arg(short = 't', long)]
    time: Option<String>,
}

#[derive(Args, Debug, PartialEq, Eq)]
struct EditArgs {
    task: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(short = 'd', long)]
    description: Option<String>,
    #[arg(short = 'p', long)]
    priority: Option<String>,
    #[arg(short = 'c', long)]
    category: Option<String>,
    #[arg(long)]
    due: Option<String>,
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    end: Option<String>,
    #[arg(long, conflicts_with = "unstar")]
    star: bool,
    #[arg(long)]
    unstar: bool,
}

#[derive(Args, Debug, PartialEq, Eq)]
struct FilterArgs {
    #[arg(short = 'p', long)]
    priority: Option<String>,
    #[arg(short = 'c', long)]
    category: Option<String>,
    #[arg(short = 't', long)]
    text: Option<String>,
    #[arg(long, conflicts_with_all = ["priority", "category", "text"])]
    clear: bool,
}

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Shell state: the session plus the ids of the last listing, so rows can
/// be addressed by number.
pub struct Shell {
    session: Session,
    last_listing: Vec<TaskId>,
}

impl Shell {
    pub const fn new(session: Session) -> Self {
        Self {
            session,
            last_listing: Vec::new(),
        }
    }

    /// Execute every line of `input` until it ends or `quit` is read.
    ///
    /// # Errors
    /// Returns an error only when reading input or writing output fails.
    pub fn run<R, W>(&mut self, input: R, out: &mut W, clock: impl Fn() -> OffsetDateTime) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            if self.execute(&line, clock(), out)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Execute a single line. Bad input is reported on `out` and never ends the shell.
    ///
    /// # Errors
    /// Returns an error only when writing output fails.
    pub fn execute<W: Write>(&mut self, line: &str, now: OffsetDateTime, out: &mut W) -> Result<Flow> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(Flow::Continue);
        }
        let words = match shell_words::split(trimmed) {
            Ok(words) => words,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                return Ok(Flow::Continue);
            }
        };
        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                write!(out, "{err}")?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "Parsed shell command");
        match self.dispatch(command, now, out) {
            Ok(flow) => Ok(flow),
            Err(err) => {
                warn!(error = %err, "Command failed");
                writeln!(out, "error: {err:#}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch<W: Write>(&mut self, command: ShellCommand, now: OffsetDateTime, out: &mut W) -> Result<Flow> {
        match command {
            ShellCommand::Add(args) => self.add(args, now, out)?,
            ShellCommand::Quick(args) => self.quick(args, now, out)?,
            ShellCommand::Edit(args) => self.edit(args, out)?,
            ShellCommand::Done { task } => {
                let id = self.resolve(&task)?;
                self.session.toggle_completed(id, now);
                let task = self.task(id)?;
                let state = if task.completed { "completed" } else { "reopened" };
                writeln!(out, "{state}: {}", task.title)?;
            }
            ShellCommand::Star { task } => {
                let id = self.resolve(&task)?;
                self.session.toggle_starred(id);
                let task = self.task(id)?;
                let state = if task.starred { "starred" } else { "unstarred" };
                writeln!(out, "{state}: {}", task.title)?;
            }
            ShellCommand::Rm { task } => {
                let id = self.resolve(&task)?;
                let title = self.task(id)?.title.clone();
                self.session.delete_task(id);
                writeln!(out, "deleted: {title}")?;
            }
            ShellCommand::Move { from, to } => {
                let from = self.resolve(&from)?;
                let to = self.resolve(&to)?;
                self.session.reorder(from, to);
                let position = self
                    .session
                    .store()
                    .position(from)
                    .ok_or_else(|| anyhow!("task {from} vanished while moving"))?;
                writeln!(out, "moved: {} (position {})", self.task(from)?.title, position + 1)?;
            }
            ShellCommand::Ls => self.list(now, out)?,
            ShellCommand::Show { task } => {
                let id = self.resolve(&task)?;
                writeln!(out, "{}", serde_json::to_string_pretty(self.task(id)?)?)?;
            }
            ShellCommand::View { name } => self.view(name.as_deref(), now, out)?,
            ShellCommand::Filter(args) => self.filter(args, out)?,
            ShellCommand::Cal => self.calendar(now, out)?,
            ShellCommand::Today => {
                self.session.go_to_today(now.date());
                self.focused(out)?;
            }
            ShellCommand::NextMonth => {
                self.session.next_month();
                self.focused(out)?;
            }
            ShellCommand::PrevMonth => {
                self.session.prev_month();
                self.focused(out)?;
            }
            ShellCommand::NextDay => {
                self.session.next_day();
                self.focused(out)?;
            }
            ShellCommand::PrevDay => {
                self.session.prev_day();
                self.focused(out)?;
            }
            ShellCommand::Settings => render::settings(out, self.session.settings())?,
            ShellCommand::Help => write!(out, "{}", ShellLine::command().render_help())?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn add<W: Write>(&mut self, args: AddArgs, now: OffsetDateTime, out: &mut W) -> Result<()> {
        let AddArgs {
            title,
            description,
            priority,
            category,
            due,
            start,
            end,
            star,
        } = args;
        let draft = NewTask {
            title: title.join(" "),
            description: description.unwrap_or_default(),
            priority: parse_or_default(priority.as_deref())?,
            category: parse_or_default(category.as_deref())?,
            due_date: due.as_deref().map(parse_date).transpose()?,
            start_time: start.as_deref().map(ClockTime::from_str).transpose()?,
            end_time: end.as_deref().map(ClockTime::from_str).transpose()?,
            starred: star,
        };
        let id = self
            .session
            .add_task(draft, now)
            .ok_or_else(|| anyhow!("title must not be empty"))?;
        writeln!(out, "created task: {id}")?;
        Ok(())
    }

    fn quick<W: Write>(&mut self, args: QuickArgs, now: OffsetDateTime, out: &mut W) -> Result<()> {
        let QuickArgs {
            date,
            title,
            priority,
            category,
            time,
        } = args;
        let day = parse_date(&date)?;
        let id = self
            .session
            .quick_add(
                title.join(" "),
                day,
                parse_or_default(priority.as_deref())?,
                parse_or_default(category.as_deref())?,
                time.as_deref().map(ClockTime::from_str).transpose()?,
                now,
            )
            .ok_or_else(|| anyhow!("title must not be empty"))?;
        writeln!(out, "created task: {id} on {day}")?;
        Ok(())
    }

    fn edit<W: Write>(&mut self, args: EditArgs, out: &mut W) -> Result<()> {
        let id = self.resolve(&args.task)?;
        let edits = collect_edits(args)?;
        if edits.is_empty() {
            bail!("nothing to edit; pass at least one field flag");
        }
        self.session.edit_task(id, edits);
        writeln!(out, "updated: {}", self.task(id)?.title)?;
        Ok(())
    }

    fn list<W: Write>(&mut self, now: OffsetDateTime, out: &mut W) -> Result<()> {
        let tasks = self.session.list_view(now);
        self.last_listing = tasks.iter().map(|task| task.id).collect();
        let counts = self.session.counts(now);
        writeln!(
            out,
            "{} ({} open, {} starred) filter: {}",
            self.session.view(),
            counts.my_tasks,
            counts.starred,
            describe_filter(self.session.filter())
        )?;
        if tasks.is_empty() {
            if self.session.filter().is_empty() {
                writeln!(out, "No tasks found")?;
            } else {
                writeln!(out, "No tasks matched the active filter")?;
            }
            return Ok(());
        }
        render::task_table(out, &tasks)?;
        Ok(())
    }

    fn view<W: Write>(&mut self, name: Option<&str>, now: OffsetDateTime, out: &mut W) -> Result<()> {
        if let Some(name) = name {
            let view: SidebarView = name.parse()?;
            self.session.set_view(view);
        }
        let counts = self.session.counts(now);
        writeln!(
            out,
            "view: {} (tasks {}, starred {})",
            self.session.view(),
            counts.my_tasks,
            counts.starred
        )?;
        Ok(())
    }

    fn filter<W: Write>(&mut self, args: FilterArgs, out: &mut W) -> Result<()> {
        let FilterArgs {
            priority,
            category,
            text,
            clear,
        } = args;
        if clear {
            self.session.clear_filter();
        } else if priority.is_some() || category.is_some() || text.is_some() {
            let filter = TaskFilterBuilder::new()
                .with_priority(priority.as_deref())?
                .with_category(category.as_deref())?
                .with_text(text)
                .build();
            self.session.set_filter(filter);
        }
        writeln!(out, "filter: {}", describe_filter(self.session.filter()))?;
        Ok(())
    }

    fn calendar<W: Write>(&self, now: OffsetDateTime, out: &mut W) -> Result<()> {
        let grid = self
            .session
            .month_grid()
            .ok_or_else(|| anyhow!("focused month is outside the supported date range"))?;
        let cells = self.session.calendar_cells(now);
        render::calendar(out, &grid, &cells)?;
        Ok(())
    }

    fn focused<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "focused: {}", self.session.cursor().date())?;
        Ok(())
    }

    /// Resolve a row number of the last `ls` or a full task id.
    fn resolve(&self, raw: &str) -> Result<TaskId> {
        let raw = raw.trim();
        let id = if let Ok(row) = raw.parse::<usize>() {
            row.checked_sub(1)
                .and_then(|idx| self.last_listing.get(idx))
                .copied()
                .ok_or_else(|| anyhow!("no row {row} in the last listing; run `ls` first"))?
        } else {
            TaskId::from_str(raw).with_context(|| format!("Invalid task id: {raw}"))?
        };
        self.task(id)?;
        Ok(id)
    }

    fn task(&self, id: TaskId) -> Result<&Task> {
        self.session
            .store()
            .get(id)
            .ok_or_else(|| anyhow!("task {id} not found"))
    }
}

fn parse_or_default<T>(raw: Option<&str>) -> Result<T, ParseError>
where
    T: FromStr<Err = ParseError> + Default,
{
    raw.map_or_else(|| Ok(T::default()), str::parse)
}

/// Parse a value that may be the literal `none`.
fn clearable<T>(raw: &str, parse: impl FnOnce(&str) -> Result<T, ParseError>) -> Result<Option<T>, ParseError> {
    if raw.trim().eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse(raw).map(Some)
    }
}

fn collect_edits(args: EditArgs) -> Result<Vec<TaskEdit>> {
    let EditArgs {
        task: _,
        title,
        description,
        priority,
        category,
        due,
        start,
        end,
        star,
        unstar,
    } = args;

    let mut edits = Vec::new();
    if let Some(title) = title {
        if title.trim().is_empty() {
            bail!("title must not be empty");
        }
        edits.push(TaskEdit::Title(title));
    }
    if let Some(description) = description {
        edits.push(TaskEdit::Description(description));
    }
    if let Some(priority) = priority {
        edits.push(TaskEdit::Priority(priority.parse::<Priority>()?));
    }
    if let Some(category) = category {
        edits.push(TaskEdit::Category(category.parse::<Category>()?));
    }
    if let Some(due) = due {
        edits.push(TaskEdit::DueDate(clearable(&due, parse_date)?));
    }
    if let Some(start) = start {
        edits.push(TaskEdit::StartTime(clearable(&start, ClockTime::from_str)?));
    }
    if let Some(end) = end {
        edits.push(TaskEdit::EndTime(clearable(&end, ClockTime::from_str)?));
    }
    if star {
        edits.push(TaskEdit::Starred(true));
    } else if unstar {
        edits.push(TaskEdit::Starred(false));
    }
    Ok(edits)
}
