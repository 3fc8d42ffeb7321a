//! Command-line front end over the matrix store.
//!
//! Presentation glue only: every subcommand maps onto one store
//! operation and prints the result. Destructive commands ask for
//! confirmation unless `--yes` is passed.

use crate::config::Settings;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::tasks::models::{NewTask, Priority, Quadrant, Task};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Eisenhower-matrix task tracker.
#[derive(Parser, Debug)]
#[command(name = "eisenhower")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Use a specific database file instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

fn parse_quadrant(s: &str) -> std::result::Result<Quadrant, String> {
    let value: u8 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    Quadrant::from_u8(value).map_err(|e| e.to_string())
}

fn parse_priority(s: &str) -> std::result::Result<Priority, String> {
    Priority::from_str(s).map_err(|e| e.to_string())
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task.
    Add {
        /// Task name.
        name: String,

        /// Longer description.
        #[arg(long, default_value = "")]
        description: String,

        /// Quadrant to file the task under (1-4).
        #[arg(long, short, value_parser = parse_quadrant, default_value = "1")]
        quadrant: Quadrant,

        /// Priority within the quadrant.
        #[arg(long, short, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
    },

    /// List tasks, optionally scoped to one quadrant.
    List {
        /// Only show this quadrant (1-4).
        #[arg(long, short, value_parser = parse_quadrant)]
        quadrant: Option<Quadrant>,
    },

    /// Show one task in full.
    Show {
        /// Task id.
        id: String,
    },

    /// Edit a task's fields.
    Edit {
        /// Task id.
        id: String,

        /// New name.
        #[arg(long)]
        name: Option<String>,

        /// New description.
        #[arg(long)]
        description: Option<String>,

        /// New priority.
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },

    /// Move a task to another quadrant.
    Move {
        /// Task id.
        id: String,

        /// Target quadrant (1-4).
        #[arg(value_parser = parse_quadrant)]
        quadrant: Quadrant,
    },

    /// Mark a task completed.
    Complete {
        /// Task id.
        id: String,
    },

    /// Delete a task.
    Delete {
        /// Task id.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Show recent activity, most recent first.
    History {
        /// Maximum number of entries.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Irreversibly delete all recorded activity.
    #[command(name = "clear-history")]
    ClearHistory {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Show per-day activity counters.
    Stats {
        /// Number of days including today.
        #[arg(long)]
        days: Option<u32>,
    },
}

/// Run a parsed command against the configured store.
///
/// # Errors
///
/// Returns any error from settings loading or the store operation.
pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    let db_path = cli
        .database
        .or_else(|| settings.database_path())
        .ok_or_else(|| Error::Unavailable("home directory not found".to_string()))?;
    let matrix = Matrix::new(Database::new(db_path)?, &settings);

    match cli.command {
        Command::Add { name, description, quadrant, priority } => {
            let task =
                matrix.create_task(NewTask { name, description, quadrant, priority })?;
            println!("Added {} to {} ({})", task.id, task.quadrant, task.quadrant.label());
        }
        Command::List { quadrant } => match quadrant {
            Some(q) => print_quadrant(q, &matrix.tasks_by_quadrant(q)?),
            None => {
                let tasks = matrix.all_tasks()?;
                for q in Quadrant::ALL {
                    let in_quadrant: Vec<Task> =
                        tasks.iter().filter(|t| t.quadrant == q).cloned().collect();
                    print_quadrant(q, &in_quadrant);
                }
            }
        },
        Command::Show { id } => match matrix.get_task(&id)? {
            Some(task) => print_task(&task),
            None => println!("no task with id '{id}'"),
        },
        Command::Edit { id, name, description, priority } => {
            let mut task = matrix.get_task(&id)?.ok_or_else(|| Error::NotFound {
                collection: crate::db::collections::TASKS,
                key: id,
            })?;
            if let Some(name) = name {
                if name.trim().is_empty() {
                    return Err(Error::EmptyName);
                }
                task.name = name;
            }
            if let Some(description) = description {
                task.description = description;
            }
            if let Some(priority) = priority {
                task.priority = priority;
            }
            let task = matrix.update_task(task)?;
            println!("Updated {}", task.id);
        }
        Command::Move { id, quadrant } => {
            let task = matrix.move_task(&id, quadrant)?;
            println!("Moved {} to {} ({})", task.id, quadrant, quadrant.label());
        }
        Command::Complete { id } => {
            let task = matrix.complete_task(&id)?;
            println!("Completed {}", task.id);
        }
        Command::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete task '{id}'? This cannot be undone.")) {
                println!("aborted");
                return Ok(());
            }
            let task = matrix.delete_task(&id)?;
            println!("Deleted {} ({})", task.id, task.name);
        }
        Command::History { limit } => {
            let entries = matrix.history(limit.unwrap_or(settings.history_limit))?;
            if entries.is_empty() {
                println!("no recorded activity");
            }
            for entry in entries {
                println!("{}  [{}] {} ({})", entry.timestamp, entry.action, entry.description, entry.user);
            }
        }
        Command::ClearHistory { yes } => {
            if !yes && !confirm("Clear all recorded activity? This cannot be undone.") {
                println!("aborted");
                return Ok(());
            }
            matrix.clear_history()?;
            println!("history cleared");
        }
        Command::Stats { days } => {
            let window = matrix.analytics(days.unwrap_or(settings.analytics_days))?;
            println!("{:<12} {:>8} {:>10} {:>8} {:>6}", "date", "created", "completed", "deleted", "moved");
            for day in window {
                println!(
                    "{:<12} {:>8} {:>10} {:>8} {:>6}",
                    day.date, day.tasks_created, day.tasks_completed, day.tasks_deleted, day.tasks_moved
                );
            }
        }
    }

    Ok(())
}

/// Ask the user to confirm a destructive action.
fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("y")
}

fn print_quadrant(quadrant: Quadrant, tasks: &[Task]) {
    println!("{} - {} ({} tasks)", quadrant, quadrant.label(), tasks.len());
    for task in tasks {
        let marker = if task.is_completed() { "x" } else { " " };
        println!("  [{marker}] {}  {} ({})", task.id, task.name, task.priority);
    }
}

fn print_task(task: &Task) {
    println!("{}  {}", task.id, task.name);
    if !task.description.is_empty() {
        println!("  {}", task.description);
    }
    println!("  quadrant:  {} ({})", task.quadrant, task.quadrant.label());
    println!("  priority:  {}", task.priority);
    println!("  status:    {}", task.status);
    println!("  created:   {}", task.created_at);
    println!("  updated:   {}", task.updated_at);
    if let Some(completed_at) = &task.completed_at {
        println!("  completed: {completed_at}");
    }
}
