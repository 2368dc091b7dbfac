//! Daily-task types.
//!
//! Tasks are one-off checklist items tied to a single calendar date. They
//! carry no streak semantics; completing one is a plain flag flip.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A one-off task for a specific day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTask {
    /// Unique identifier (SQLite rowid)
    pub id: i64,
    /// Task description
    pub name: String,
    /// Completion flag
    pub done: bool,
    /// The day this task belongs to
    pub date: NaiveDate,
    /// Optional reminder in HH:MM
    pub reminder_time: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl DailyTask {
    /// Whether the task is for the given date.
    pub fn is_for(&self, date: NaiveDate) -> bool {
        self.date == date
    }

    /// Whether the task is past its date and still not done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.done && self.date < today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(done: bool, date: NaiveDate) -> DailyTask {
        DailyTask {
            id: 1,
            name: "Write report".to_string(),
            done,
            date,
            reminder_time: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn overdue_only_when_pending_and_past() {
        let today = day(2024, 3, 10);
        assert!(task(false, day(2024, 3, 9)).is_overdue(today));
        assert!(!task(true, day(2024, 3, 9)).is_overdue(today));
        assert!(!task(false, today).is_overdue(today));
    }
}
