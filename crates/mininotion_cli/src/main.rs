//! `mininotion` command-line front end.
//!
//! # Responsibility
//! - Parse flags into `AppConfig` and task use-case calls.
//! - Save the task list after every successful mutating command.

mod render;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use mininotion_core::{
    init_logging, parse_date_expr, AppConfig, Priority, SortKey, Status, StorageBackend,
    TaskDraft, TaskFilter, TaskPatch, TaskService, TaskStore,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Small personal task manager with subtasks, priorities and due dates.
#[derive(Parser, Debug)]
#[command(name = "mininotion", author, version, about, long_about = None)]
struct Cli {
    /// Task snapshot file (JSON) or database (SQLite).
    #[arg(long, global = true, env = "MININOTION_DATA")]
    data: Option<PathBuf>,

    /// Storage backend: json or sqlite.
    #[arg(long, global = true, env = "MININOTION_BACKEND", default_value = "json")]
    backend: StorageBackend,

    #[arg(long, global = true, env = "MININOTION_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log directory. Defaults to `logs/` next to the data file.
    #[arg(long, global = true, env = "MININOTION_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tasks, optionally filtered and sorted.
    List {
        /// Case-insensitive title search.
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        /// due or priority.
        #[arg(long, default_value = "due")]
        sort: SortKey,
    },
    /// Show one task with its description and subtasks.
    Show { id: String },
    /// Add a new task.
    Add(AddArgs),
    /// Edit fields of an existing task.
    Edit(EditArgs),
    /// Permanently delete a task.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Manage the subtask checklist of a task.
    #[command(subcommand)]
    Subtask(SubtaskCommand),
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long, short)]
    title: String,
    #[arg(long, short, default_value = "")]
    description: String,
    #[arg(long, short, value_enum, default_value_t = PriorityArg::Medium)]
    priority: PriorityArg,
    #[arg(long, value_enum, default_value_t = StatusArg::Todo)]
    status: StatusArg,
    /// YYYY-MM-DD, today, tomorrow, yesterday or +Nd/-Nd. Defaults to today.
    #[arg(long, allow_hyphen_values = true, conflicts_with = "no_due")]
    due: Option<String>,
    /// Create the task without a due date.
    #[arg(long)]
    no_due: bool,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: String,
    #[arg(long, short)]
    title: Option<String>,
    #[arg(long, short)]
    description: Option<String>,
    #[arg(long, short, value_enum)]
    priority: Option<PriorityArg>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    #[arg(long, allow_hyphen_values = true, conflicts_with = "no_due")]
    due: Option<String>,
    /// Clear the due date.
    #[arg(long)]
    no_due: bool,
}

#[derive(Subcommand, Debug)]
enum SubtaskCommand {
    /// Append a subtask.
    Add { id: String, text: String },
    /// Check off subtask number `n` (as shown by `show`).
    Done { id: String, n: usize },
    /// Uncheck subtask number `n`.
    Undo { id: String, n: usize },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    Todo,
    InProgress,
    Done,
}

impl From<StatusArg> for Status {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Todo => Status::ToDo,
            StatusArg::InProgress => Status::InProgress,
            StatusArg::Done => Status::Done,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig {
        backend: cli.backend,
        data_path: cli.data,
        log_level: cli.log_level,
        log_dir: cli.log_dir,
    };

    let cwd = std::env::current_dir().context("could not read current directory")?;
    if let Err(err) = init_logging(config.log_level(), &config.log_dir(&cwd)) {
        eprintln!("warning: logging disabled: {err}");
    }

    let store = config.open_store().with_context(|| {
        format!(
            "could not open {} store at `{}`",
            config.backend,
            config.data_path().display()
        )
    })?;
    let mut service = TaskService::open(store).with_context(|| {
        format!("could not load tasks from `{}`", config.data_path().display())
    })?;

    let today = Local::now().date_naive();
    execute(&mut service, cli.command, today)?;

    if service.is_dirty() {
        service.save().context("could not save tasks")?;
        info!("event=cli_save module=cli status=ok count={}", service.tasks().len());
    }
    Ok(())
}

fn execute<S: TaskStore>(
    service: &mut TaskService<S>,
    command: Command,
    today: NaiveDate,
) -> Result<()> {
    match command {
        Command::List {
            search,
            status,
            sort,
        } => {
            let filter = TaskFilter {
                search,
                status: status.map(Status::from),
            };
            let visible = service.view(&filter, sort);
            println!("{}", render::task_list(&visible, today));
        }
        Command::Show { id } => {
            let id = service.resolve_id(&id)?;
            let task = service.get(id).context("task vanished after lookup")?;
            println!("{}", render::details(task));
        }
        Command::Add(args) => {
            let mut draft = TaskDraft::new(args.title, today);
            draft.description = args.description;
            draft.priority = args.priority.into();
            draft.status = args.status.into();
            if args.no_due {
                draft.due_date = None;
            } else if let Some(due) = args.due.as_deref() {
                draft.due_date = Some(parse_due(due, today)?);
            }
            let task = service.create_task(draft)?;
            println!("Added {}  {}", render::short_id(task), task.title);
        }
        Command::Edit(args) => {
            let id = service.resolve_id(&args.id)?;
            let due_date = if args.no_due {
                Some(None)
            } else {
                args.due
                    .as_deref()
                    .map(|due| parse_due(due, today).map(Some))
                    .transpose()?
            };
            let patch = TaskPatch {
                title: args.title,
                description: args.description,
                priority: args.priority.map(Priority::from),
                status: args.status.map(Status::from),
                due_date,
            };
            if patch.is_empty() {
                bail!("nothing to change; pass at least one field to edit");
            }
            let task = service.update_task(id, patch)?;
            println!("{}", render::details(task));
        }
        Command::Delete { id, yes } => {
            let id = service.resolve_id(&id)?;
            let title = service
                .get(id)
                .map(|task| task.title.clone())
                .context("task vanished after lookup")?;
            if !yes && !confirm(&format!("Delete Task: \"{title}\"? [y/N] "))? {
                println!("Cancelled.");
                return Ok(());
            }
            service.delete_task(id)?;
            println!("Deleted \"{title}\"");
        }
        Command::Subtask(subcommand) => {
            let task = match subcommand {
                SubtaskCommand::Add { id, text } => {
                    let id = service.resolve_id(&id)?;
                    service.add_subtask(id, &text)?
                }
                SubtaskCommand::Done { id, n } => {
                    let id = service.resolve_id(&id)?;
                    service.set_subtask_completed(id, subtask_index(n)?, true)?
                }
                SubtaskCommand::Undo { id, n } => {
                    let id = service.resolve_id(&id)?;
                    service.set_subtask_completed(id, subtask_index(n)?, false)?
                }
            };
            println!("{}", render::details(task));
        }
    }
    Ok(())
}

fn parse_due(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    parse_date_expr(input, today).map_err(anyhow::Error::msg)
}

/// Converts the 1-based number shown to users into a list index.
fn subtask_index(n: usize) -> Result<usize> {
    match n.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("subtask numbers start at 1"),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = std::io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("could not read confirmation")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
