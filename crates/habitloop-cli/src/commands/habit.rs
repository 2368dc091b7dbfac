//! Habit management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use habitloop_core::{Config, Database};

use super::today;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Daily reminder (HH:MM); falls back to the configured default
        #[arg(long)]
        reminder: Option<String>,
    },
    /// List habits with their completion status for today
    List {
        /// Show archived habits instead of active ones
        #[arg(long)]
        archived: bool,
    },
    /// Mark a habit completed for a day
    Complete {
        /// Habit ID
        id: i64,
        /// Completion date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Undo a day's completion and recompute the streak
    Uncomplete {
        /// Habit ID
        id: i64,
        /// Completion date to undo (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Update a habit's name or reminder
    Update {
        /// Habit ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New reminder (HH:MM)
        #[arg(long)]
        reminder: Option<String>,
        /// Remove the reminder
        #[arg(long, conflicts_with = "reminder")]
        clear_reminder: bool,
    },
    /// Archive a habit (history and streak survive)
    Archive {
        /// Habit ID
        id: i64,
    },
    /// Bring an archived habit back
    Unarchive {
        /// Habit ID
        id: i64,
    },
    /// Delete a habit and its completion history
    Delete {
        /// Habit ID
        id: i64,
    },
    /// Show a habit's completion history
    History {
        /// Habit ID
        id: i64,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        HabitAction::Add { name, reminder } => {
            let config = Config::load_or_default();
            let reminder = reminder.or_else(|| {
                if config.notifications.enabled {
                    config.notifications.default_reminder_time.clone()
                } else {
                    None
                }
            });
            let habit = db.create_habit(&name, reminder.as_deref())?;
            println!("Habit created: {}", habit.id);
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List { archived } => {
            let entries = db.list_habits(archived, today())?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        HabitAction::Complete { id, date } => {
            let outcome = db.complete_habit(id, date.unwrap_or_else(today))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        HabitAction::Uncomplete { id, date } => {
            let outcome = db.uncomplete_habit(id, date.unwrap_or_else(today))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        HabitAction::Update {
            id,
            name,
            reminder,
            clear_reminder,
        } => {
            let reminder_update = if clear_reminder {
                Some(None)
            } else {
                reminder.as_deref().map(Some)
            };
            let habit = db.update_habit(id, name.as_deref(), reminder_update)?;
            println!("Habit updated:");
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Archive { id } => {
            db.set_habit_archived(id, true)?;
            println!("Habit archived: {id}");
        }
        HabitAction::Unarchive { id } => {
            db.set_habit_archived(id, false)?;
            println!("Habit unarchived: {id}");
        }
        HabitAction::Delete { id } => {
            db.delete_habit(id)?;
            println!("Habit deleted: {id}");
        }
        HabitAction::History { id } => {
            let records = db.completion_history(id)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
