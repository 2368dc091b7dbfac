//! Daily-task commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use habitloop_core::Database;

use super::today;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task for a day
    Add {
        /// Task description
        name: String,
        /// Task date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Reminder (HH:MM)
        #[arg(long)]
        reminder: Option<String>,
    },
    /// List tasks for a day
    List {
        /// Date to list (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Mark a task done
    Complete {
        /// Task ID
        id: i64,
    },
    /// Mark a task pending again
    Uncomplete {
        /// Task ID
        id: i64,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Add {
            name,
            date,
            reminder,
        } => {
            let task = db.create_task(&name, date.unwrap_or_else(today), reminder.as_deref())?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { date } => {
            let tasks = db.list_tasks(date.unwrap_or_else(today))?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Complete { id } => {
            db.set_task_done(id, true)?;
            println!("Task completed: {id}");
        }
        TaskAction::Uncomplete { id } => {
            db.set_task_done(id, false)?;
            println!("Task marked pending: {id}");
        }
        TaskAction::Delete { id } => {
            db.delete_task(id)?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
