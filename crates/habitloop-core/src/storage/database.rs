//! SQLite-based storage for habits, daily tasks, and completion history.
//!
//! All habit mutations that touch the completion set run inside a single
//! `BEGIN IMMEDIATE` transaction: precondition checks, the completion
//! insert/delete, and the cached streak/last_done update commit together
//! or roll back together. Concurrent same-day completions therefore
//! serialize; exactly one wins, the other observes AlreadyCompleted.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, migrations};
use crate::error::{DatabaseError, HabitError, Result, TaskError, ValidationError};
use crate::habit::{
    self, streak, CompletionOutcome, CompletionRecord, Habit, HabitEntry, UncompleteOutcome,
};
use crate::task::DailyTask;

// === Helper Functions ===

/// Format a calendar date for database storage.
fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a stored calendar date, tolerating junk as absent.
fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse datetime from RFC3339 string with fallback to current time.
fn parse_datetime_fallback(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

const HABIT_COLUMNS: &str =
    "id, name, streak, last_done, reminder_time, COALESCE(is_archived, 0), created_at";

/// Build a Habit from a database row (HABIT_COLUMNS order).
fn row_to_habit(row: &rusqlite::Row) -> rusqlite::Result<Habit> {
    let last_done: Option<String> = row.get(3)?;
    let created_at: String = row.get(6)?;
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        streak: row.get(2)?,
        last_done: last_done.as_deref().and_then(parse_date),
        reminder_time: row.get(4)?,
        archived: row.get::<_, i64>(5)? != 0,
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// Build a DailyTask from a database row.
fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<DailyTask> {
    let date: String = row.get(3)?;
    let created_at: String = row.get(5)?;
    Ok(DailyTask {
        id: row.get(0)?,
        name: row.get(1)?,
        done: row.get::<_, i64>(2)? != 0,
        date: parse_date(&date).unwrap_or_else(|| Utc::now().date_naive()),
        reminder_time: row.get(4)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

fn get_habit_row(conn: &Connection, id: i64) -> rusqlite::Result<Option<Habit>> {
    conn.query_row(
        &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"),
        params![id],
        row_to_habit,
    )
    .optional()
}

fn find_habit_by_name_row(
    conn: &Connection,
    name: &str,
    exclude_id: Option<i64>,
) -> rusqlite::Result<Option<i64>> {
    match exclude_id {
        Some(id) => conn
            .query_row(
                "SELECT id FROM habits WHERE LOWER(name) = LOWER(?1) AND id != ?2",
                params![name, id],
                |row| row.get(0),
            )
            .optional(),
        None => conn
            .query_row(
                "SELECT id FROM habits WHERE LOWER(name) = LOWER(?1)",
                params![name],
                |row| row.get(0),
            )
            .optional(),
    }
}

fn completion_exists(conn: &Connection, habit_id: i64, date: NaiveDate) -> rusqlite::Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM habit_completions WHERE habit_id = ?1 AND date = ?2",
            params![habit_id, format_date(date)],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn completion_dates_desc(conn: &Connection, habit_id: i64) -> rusqlite::Result<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(
        "SELECT date FROM habit_completions WHERE habit_id = ?1 ORDER BY date DESC",
    )?;
    let mut rows = stmt.query(params![habit_id])?;
    let mut dates = Vec::new();
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        if let Some(date) = parse_date(&raw) {
            dates.push(date);
        }
    }
    Ok(dates)
}

/// SQLite database for habit and task storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/habitloop/habitloop.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("habitloop.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and ephemeral use).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> rusqlite::Result<()> {
        // v1 baseline schema; later columns are added by migrations.
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS habits (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                name       TEXT NOT NULL UNIQUE,
                streak     INTEGER NOT NULL DEFAULT 0,
                last_done  TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                name       TEXT NOT NULL,
                done       INTEGER NOT NULL DEFAULT 0,
                date       TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS habit_completions (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                habit_id   INTEGER NOT NULL REFERENCES habits(id),
                date       TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(habit_id, date)
            );

            CREATE INDEX IF NOT EXISTS idx_habits_name ON habits(name);
            CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date);
            CREATE INDEX IF NOT EXISTS idx_habit_completions_habit_date
                ON habit_completions(habit_id, date);",
        )?;

        migrations::migrate(&self.conn)?;
        Ok(())
    }

    /// Run a closure inside a BEGIN IMMEDIATE transaction.
    fn in_transaction<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        match f(&self.conn) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(value)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }

    // === Habit CRUD ===

    /// Create a new habit with streak 0 and no completions.
    ///
    /// # Errors
    /// Returns `HabitError::DuplicateName` if another habit (archived
    /// included) already uses the name case-insensitively.
    pub fn create_habit(&self, name: &str, reminder_time: Option<&str>) -> Result<Habit> {
        let name = habit::normalize_name(name, "Habit name")?;
        if let Some(reminder) = reminder_time {
            habit::validate_reminder(reminder)?;
        }
        let created_at = Utc::now();

        self.in_transaction(|conn| {
            if find_habit_by_name_row(conn, &name, None)?.is_some() {
                return Err(HabitError::DuplicateName(name.clone()).into());
            }

            conn.execute(
                "INSERT INTO habits (name, streak, last_done, created_at, reminder_time)
                 VALUES (?1, 0, NULL, ?2, ?3)",
                params![name, created_at.to_rfc3339(), reminder_time],
            )?;

            Ok(Habit {
                id: conn.last_insert_rowid(),
                name: name.clone(),
                streak: 0,
                last_done: None,
                reminder_time: reminder_time.map(str::to_string),
                archived: false,
                created_at,
            })
        })
    }

    /// Get a habit by id.
    pub fn get_habit(&self, id: i64) -> Result<Option<Habit>> {
        Ok(get_habit_row(&self.conn, id)?)
    }

    /// List habits with their completion status for `on`, newest first.
    ///
    /// `archived` selects the archived or the active set.
    pub fn list_habits(&self, archived: bool, on: NaiveDate) -> Result<Vec<HabitEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits
             WHERE COALESCE(is_archived, 0) = ?1
             ORDER BY created_at DESC"
        ))?;
        let habits = stmt
            .query_map(params![archived as i64], row_to_habit)?
            .collect::<rusqlite::Result<Vec<Habit>>>()?;

        let mut entries = Vec::with_capacity(habits.len());
        for habit in habits {
            let done_today = completion_exists(&self.conn, habit.id, on)?;
            entries.push(HabitEntry { habit, done_today });
        }
        Ok(entries)
    }

    /// Update a habit's name and/or reminder.
    ///
    /// `reminder_time` semantics: `None` leaves the field untouched,
    /// `Some(None)` clears it, `Some(Some(v))` sets it.
    pub fn update_habit(
        &self,
        id: i64,
        name: Option<&str>,
        reminder_time: Option<Option<&str>>,
    ) -> Result<Habit> {
        if name.is_none() && reminder_time.is_none() {
            return Err(ValidationError::NothingToUpdate.into());
        }
        if let Some(Some(reminder)) = reminder_time {
            habit::validate_reminder(reminder)?;
        }

        self.in_transaction(|conn| {
            if get_habit_row(conn, id)?.is_none() {
                return Err(HabitError::NotFound { id }.into());
            }

            if let Some(raw) = name {
                let new_name = habit::normalize_name(raw, "Habit name")?;
                if find_habit_by_name_row(conn, &new_name, Some(id))?.is_some() {
                    return Err(HabitError::DuplicateName(new_name).into());
                }
                conn.execute(
                    "UPDATE habits SET name = ?1 WHERE id = ?2",
                    params![new_name, id],
                )?;
            }

            if let Some(reminder) = reminder_time {
                conn.execute(
                    "UPDATE habits SET reminder_time = ?1 WHERE id = ?2",
                    params![reminder, id],
                )?;
            }

            // Freshly updated row is guaranteed to exist here.
            get_habit_row(conn, id)?
                .ok_or_else(|| HabitError::NotFound { id }.into())
        })
    }

    /// Set or clear a habit's archived flag. History and streak survive.
    pub fn set_habit_archived(&self, id: i64, archived: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE habits SET is_archived = ?1 WHERE id = ?2",
            params![archived as i64, id],
        )?;
        if changed == 0 {
            return Err(HabitError::NotFound { id }.into());
        }
        Ok(())
    }

    /// Delete a habit and its entire completion history.
    pub fn delete_habit(&self, id: i64) -> Result<()> {
        self.in_transaction(|conn| {
            conn.execute(
                "DELETE FROM habit_completions WHERE habit_id = ?1",
                params![id],
            )?;
            let deleted = conn.execute("DELETE FROM habits WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(HabitError::NotFound { id }.into());
            }
            Ok(())
        })
    }

    // === Streak engine operations ===

    /// Record a completion for `on` and advance the streak.
    ///
    /// # Errors
    /// `HabitError::NotFound` if the habit does not exist;
    /// `HabitError::AlreadyCompleted` if a completion for `on` already
    /// exists. State is unchanged on error.
    pub fn complete_habit(&self, id: i64, on: NaiveDate) -> Result<CompletionOutcome> {
        self.in_transaction(|conn| {
            let habit = get_habit_row(conn, id)?.ok_or(HabitError::NotFound { id })?;

            if completion_exists(conn, id, on)? {
                return Err(HabitError::AlreadyCompleted { date: on }.into());
            }

            conn.execute(
                "INSERT INTO habit_completions (habit_id, date, created_at)
                 VALUES (?1, ?2, ?3)",
                params![id, format_date(on), Utc::now().to_rfc3339()],
            )?;

            let new_streak = streak::streak_after_completion(habit.streak, habit.last_done, on);
            conn.execute(
                "UPDATE habits SET streak = ?1, last_done = ?2 WHERE id = ?3",
                params![new_streak, format_date(on), id],
            )?;

            Ok(CompletionOutcome {
                streak: new_streak,
                completed_on: on,
            })
        })
    }

    /// Undo the completion for `on` and recompute the streak from the
    /// remaining history (never by decrement).
    ///
    /// # Errors
    /// `HabitError::NotFound` if the habit does not exist;
    /// `HabitError::NotCompleted` if no completion for `on` exists.
    pub fn uncomplete_habit(&self, id: i64, on: NaiveDate) -> Result<UncompleteOutcome> {
        self.in_transaction(|conn| {
            if get_habit_row(conn, id)?.is_none() {
                return Err(HabitError::NotFound { id }.into());
            }

            let deleted = conn.execute(
                "DELETE FROM habit_completions WHERE habit_id = ?1 AND date = ?2",
                params![id, format_date(on)],
            )?;
            if deleted == 0 {
                return Err(HabitError::NotCompleted { date: on }.into());
            }

            let remaining = completion_dates_desc(conn, id)?;
            let (new_streak, last_done) = streak::recompute(&remaining);

            conn.execute(
                "UPDATE habits SET streak = ?1, last_done = ?2 WHERE id = ?3",
                params![new_streak, last_done.map(format_date), id],
            )?;

            Ok(UncompleteOutcome {
                streak: new_streak,
                last_done,
            })
        })
    }

    /// All completion dates for a habit, most recent first.
    pub fn completion_dates(&self, id: i64) -> Result<Vec<NaiveDate>> {
        if get_habit_row(&self.conn, id)?.is_none() {
            return Err(HabitError::NotFound { id }.into());
        }
        Ok(completion_dates_desc(&self.conn, id)?)
    }

    /// Full completion records for a habit, most recent first.
    pub fn completion_history(&self, id: i64) -> Result<Vec<CompletionRecord>> {
        if get_habit_row(&self.conn, id)?.is_none() {
            return Err(HabitError::NotFound { id }.into());
        }
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, date, created_at
             FROM habit_completions
             WHERE habit_id = ?1
             ORDER BY date DESC",
        )?;
        let records = stmt
            .query_map(params![id], |row| {
                let date: String = row.get(2)?;
                let created_at: String = row.get(3)?;
                Ok(CompletionRecord {
                    id: row.get(0)?,
                    habit_id: row.get(1)?,
                    date: parse_date(&date).unwrap_or_else(|| Utc::now().date_naive()),
                    created_at: parse_datetime_fallback(&created_at),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    // === Task CRUD ===

    /// Create a task for the given day.
    pub fn create_task(
        &self,
        name: &str,
        date: NaiveDate,
        reminder_time: Option<&str>,
    ) -> Result<DailyTask> {
        let name = habit::normalize_name(name, "Task name")?;
        if let Some(reminder) = reminder_time {
            habit::validate_reminder(reminder)?;
        }
        let created_at = Utc::now();

        self.conn.execute(
            "INSERT INTO tasks (name, done, date, created_at, reminder_time)
             VALUES (?1, 0, ?2, ?3, ?4)",
            params![name, format_date(date), created_at.to_rfc3339(), reminder_time],
        )?;

        Ok(DailyTask {
            id: self.conn.last_insert_rowid(),
            name,
            done: false,
            date,
            reminder_time: reminder_time.map(str::to_string),
            created_at,
        })
    }

    /// Get a task by id.
    pub fn get_task(&self, id: i64) -> Result<Option<DailyTask>> {
        let task = self
            .conn
            .query_row(
                "SELECT id, name, done, date, reminder_time, created_at
                 FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// List tasks for a given day, newest first.
    pub fn list_tasks(&self, date: NaiveDate) -> Result<Vec<DailyTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, done, date, reminder_time, created_at
             FROM tasks WHERE date = ?1 ORDER BY created_at DESC",
        )?;
        let tasks = stmt
            .query_map(params![format_date(date)], row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Set a task's done flag.
    pub fn set_task_done(&self, id: i64, done: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET done = ?1 WHERE id = ?2",
            params![done as i64, id],
        )?;
        if changed == 0 {
            return Err(TaskError::NotFound { id }.into());
        }
        Ok(())
    }

    /// Delete a task.
    pub fn delete_task(&self, id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(TaskError::NotFound { id }.into());
        }
        Ok(())
    }
}
