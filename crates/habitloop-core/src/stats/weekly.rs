//! Trailing-week summary.

use chrono::{Duration, NaiveDate};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::Database;

/// Totals over the trailing seven days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub habit_completions: u32,
    pub tasks_done: u32,
    pub active_streaks: u32,
}

impl WeeklySummary {
    /// Compute totals for the week ending at `today` (inclusive).
    pub fn trailing_week(db: &Database, today: NaiveDate) -> Result<Self> {
        let conn = db.conn();
        let week_ago = (today - Duration::days(7)).format("%Y-%m-%d").to_string();
        let today = today.format("%Y-%m-%d").to_string();

        let habit_completions: u32 = conn.query_row(
            "SELECT COUNT(*) FROM habit_completions WHERE date >= ?1 AND date <= ?2",
            params![week_ago, today],
            |row| row.get(0),
        )?;

        let tasks_done: u32 = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE date >= ?1 AND date <= ?2 AND done = 1",
            params![week_ago, today],
            |row| row.get(0),
        )?;

        let active_streaks: u32 = conn.query_row(
            "SELECT COUNT(*) FROM habits WHERE streak > 0",
            [],
            |row| row.get(0),
        )?;

        Ok(WeeklySummary {
            habit_completions,
            tasks_done,
            active_streaks,
        })
    }
}
