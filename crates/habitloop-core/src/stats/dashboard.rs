//! Daily dashboard snapshot and streak distribution.

use chrono::NaiveDate;
use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::completion_rate;
use crate::error::Result;
use crate::storage::Database;

/// Habit totals for the snapshot date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitTotals {
    pub total: u32,
    pub done_today: u32,
    pub completion_rate: f64,
}

/// Task totals for the snapshot date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTotals {
    pub total_today: u32,
    pub done_today: u32,
    pub completion_rate: f64,
}

/// Streak summary across all habits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakTotals {
    pub best_streak: u32,
    pub active_streaks: u32,
}

/// One-day dashboard snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub habits: HabitTotals,
    pub tasks: TaskTotals,
    pub streaks: StreakTotals,
}

impl DashboardStats {
    /// Compute the snapshot for `on`.
    ///
    /// `count_archived` controls whether archived habits enter the habit
    /// and streak totals.
    pub fn snapshot(db: &Database, on: NaiveDate, count_archived: bool) -> Result<Self> {
        let conn = db.conn();
        let date = on.format("%Y-%m-%d").to_string();
        let habit_filter = if count_archived {
            ""
        } else {
            " WHERE COALESCE(is_archived, 0) = 0"
        };

        let total_habits: u32 = conn.query_row(
            &format!("SELECT COUNT(*) FROM habits{habit_filter}"),
            [],
            |row| row.get(0),
        )?;
        let habits_done_today: u32 = conn.query_row(
            "SELECT COUNT(*) FROM habit_completions WHERE date = ?1",
            params![date],
            |row| row.get(0),
        )?;

        let total_tasks_today: u32 = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE date = ?1",
            params![date],
            |row| row.get(0),
        )?;
        let tasks_done_today: u32 = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE date = ?1 AND done = 1",
            params![date],
            |row| row.get(0),
        )?;

        let best_streak: u32 = conn.query_row(
            &format!("SELECT COALESCE(MAX(streak), 0) FROM habits{habit_filter}"),
            [],
            |row| row.get(0),
        )?;
        let active_filter = if count_archived {
            " WHERE streak > 0"
        } else {
            " WHERE COALESCE(is_archived, 0) = 0 AND streak > 0"
        };
        let active_streaks: u32 = conn.query_row(
            &format!("SELECT COUNT(*) FROM habits{active_filter}"),
            [],
            |row| row.get(0),
        )?;

        Ok(DashboardStats {
            habits: HabitTotals {
                total: total_habits,
                done_today: habits_done_today,
                completion_rate: completion_rate(habits_done_today, total_habits),
            },
            tasks: TaskTotals {
                total_today: total_tasks_today,
                done_today: tasks_done_today,
                completion_rate: completion_rate(tasks_done_today, total_tasks_today),
            },
            streaks: StreakTotals {
                best_streak,
                active_streaks,
            },
        })
    }
}

/// Habit counts grouped by streak strength.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreakBuckets {
    /// 7+ days
    pub excellent: u32,
    /// 3-6 days
    pub good: u32,
    /// 1-2 days
    pub starting: u32,
    /// 0 days
    pub inactive: u32,
}

impl StreakBuckets {
    /// Bucket every habit by its current streak.
    pub fn compute(db: &Database) -> Result<Self> {
        let mut stmt = db.conn().prepare("SELECT streak FROM habits")?;
        let streaks = stmt
            .query_map([], |row| row.get::<_, u32>(0))?
            .collect::<rusqlite::Result<Vec<u32>>>()?;

        let mut buckets = StreakBuckets::default();
        for streak in streaks {
            if streak >= 7 {
                buckets.excellent += 1;
            } else if streak >= 3 {
                buckets.good += 1;
            } else if streak >= 1 {
                buckets.starting += 1;
            } else {
                buckets.inactive += 1;
            }
        }
        Ok(buckets)
    }
}
