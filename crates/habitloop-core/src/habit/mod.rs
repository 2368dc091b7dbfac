//! Habit domain types.
//!
//! A habit owns a set of completion records, one per calendar day. The
//! `streak` and `last_done` fields are a cached summary of that set and
//! are rewritten together with every completion change (see [`streak`]).

pub mod streak;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A tracked habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier (SQLite rowid)
    pub id: i64,
    /// Display name, unique case-insensitively across all habits
    pub name: String,
    /// Consecutive-day completion count ending at `last_done`
    pub streak: u32,
    /// Most recent completion date, if any
    pub last_done: Option<NaiveDate>,
    /// Optional daily reminder in HH:MM
    pub reminder_time: Option<String>,
    /// Archived habits are hidden from the default listing
    pub archived: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Whether the habit was completed on the given date.
    pub fn is_done_on(&self, date: NaiveDate) -> bool {
        self.last_done == Some(date)
    }

    /// Whole days since the last completion, or `None` if never completed.
    pub fn days_since_last_done(&self, today: NaiveDate) -> Option<i64> {
        self.last_done.map(|d| (today - d).num_days())
    }

    /// Whether the streak is still alive: completed today or yesterday.
    pub fn is_streak_alive(&self, today: NaiveDate) -> bool {
        matches!(self.days_since_last_done(today), Some(0) | Some(1))
    }
}

/// A habit together with its completion status for the listing date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitEntry {
    #[serde(flatten)]
    pub habit: Habit,
    pub done_today: bool,
}

/// A single (habit, date) completion fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub id: i64,
    pub habit_id: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful complete operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub streak: u32,
    pub completed_on: NaiveDate,
}

/// Result of a successful uncomplete operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UncompleteOutcome {
    pub streak: u32,
    pub last_done: Option<NaiveDate>,
}

/// Trim a habit or task name, rejecting empty results.
pub fn normalize_name(name: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    Ok(trimmed.to_string())
}

/// Validate an HH:MM reminder string.
pub fn validate_reminder(value: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidValue {
            field: "reminder_time".to_string(),
            message: format!("'{value}' is not an HH:MM time"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(last_done: Option<NaiveDate>, streak: u32) -> Habit {
        Habit {
            id: 1,
            name: "Drink Water".to_string(),
            streak,
            last_done,
            reminder_time: None,
            archived: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn streak_alive_today_or_yesterday() {
        let today = day(2024, 3, 10);
        assert!(habit(Some(today), 3).is_streak_alive(today));
        assert!(habit(Some(day(2024, 3, 9)), 3).is_streak_alive(today));
        assert!(!habit(Some(day(2024, 3, 8)), 3).is_streak_alive(today));
        assert!(!habit(None, 0).is_streak_alive(today));
    }

    #[test]
    fn normalize_name_trims_and_rejects_empty() {
        assert_eq!(normalize_name("  Read Book ", "Habit name").unwrap(), "Read Book");
        assert!(normalize_name("   ", "Habit name").is_err());
    }

    #[test]
    fn reminder_must_be_hh_mm() {
        assert!(validate_reminder("07:30").is_ok());
        assert!(validate_reminder("7am").is_err());
        assert!(validate_reminder("25:00").is_err());
    }

    #[test]
    fn habit_serializes_dates_as_iso() {
        let json = serde_json::to_value(habit(Some(day(2024, 3, 10)), 2)).unwrap();
        assert_eq!(json["last_done"], "2024-03-10");
        assert_eq!(json["streak"], 2);
    }
}
