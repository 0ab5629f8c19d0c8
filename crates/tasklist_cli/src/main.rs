//! Command line front end over `tasklist_core`.
//!
//! # Responsibility
//! - Drive the same task store the mobile host uses, for scripting and
//!   local sanity checks.
//! - Keep output line-oriented and stable.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use std::path::PathBuf;
use tasklist_core::{
    init_logging_from_config, load_config, open_task_store, NewTask, SqliteTaskStore, Task,
    TaskCategory, TaskId,
};

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Personal to-do list")]
struct Cli {
    /// TOML config file; missing file means defaults.
    #[arg(long, global = true, default_value = "tasklist.toml")]
    config: PathBuf,

    /// SQLite file to use instead of the configured one.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a pending task.
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, value_enum, default_value_t = CategoryArg::Work)]
        category: CategoryArg,
    },
    /// Print tasks in creation order.
    List {
        #[arg(long, conflicts_with = "completed")]
        pending: bool,
        #[arg(long)]
        completed: bool,
    },
    /// Print one task in full.
    Show { id: i64 },
    /// Flip a task between pending and completed.
    Toggle { id: i64 },
    /// Remove a task.
    Delete { id: i64 },
    /// Print pending and completed counts.
    Summary,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    Work,
    Home,
    Business,
}

impl From<CategoryArg> for TaskCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Work => TaskCategory::Work,
            CategoryArg::Home => TaskCategory::Home,
            CategoryArg::Business => TaskCategory::Business,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_logging_from_config(&config).map_err(anyhow::Error::msg)?;
    debug!(
        "event=cli_start module=cli status=ok core_version={} db_path={}",
        tasklist_core::core_version(),
        config.db_path.display()
    );

    let mut store = open_task_store(&config)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    run(cli.command, &mut store)
}

fn run(command: Command, store: &mut SqliteTaskStore) -> Result<()> {
    match command {
        Command::Add {
            title,
            description,
            category,
        } => {
            let task = store.add(NewTask::new(title, description, category.into()))?;
            println!("added {}", task.id);
        }
        Command::List { pending, completed } => {
            let rows: Vec<&Task> = if pending {
                store.pending().collect()
            } else if completed {
                store.completed().collect()
            } else {
                store.tasks().iter().collect()
            };
            if rows.is_empty() {
                println!("no tasks");
            }
            for task in rows {
                println!("{}", list_row(task));
            }
        }
        Command::Show { id } => {
            let Some(task) = store.get(TaskId(id)) else {
                bail!("task not found: {id}");
            };
            print!("{}", details(task));
        }
        Command::Toggle { id } => {
            let task = store.toggle_completion(TaskId(id))?;
            println!("{} {}", task.id, status_label(&task));
        }
        Command::Delete { id } => {
            let task = store.delete(TaskId(id))?;
            println!("deleted {}", task.id);
        }
        Command::Summary => {
            let summary = store.summary();
            println!(
                "{} pending, {} completed",
                summary.pending, summary.completed
            );
        }
    }
    Ok(())
}

fn list_row(task: &Task) -> String {
    let mark = if task.completed { "✓" } else { "○" };
    format!(
        "{mark} {:>13}  {} {:<8}  {}",
        task.id,
        task.category.icon(),
        task.category,
        task.title
    )
}

fn status_label(task: &Task) -> &'static str {
    if task.completed {
        "completed"
    } else {
        "pending"
    }
}

fn details(task: &Task) -> String {
    let mut out = format!(
        "id: {}\ntitle: {}\ncategory: {} {}\nstatus: {}\n",
        task.id,
        task.title,
        task.category.icon(),
        task.category,
        status_label(task)
    );
    if !task.description.is_empty() {
        out.push_str(&format!("description: {}\n", task.description));
    }
    let created = task
        .created_at_utc()
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| task.created_at.clone());
    out.push_str(&format!("created: {created}\n"));
    out
}
