//! Statistics module for habitloop.
//!
//! Provides aggregate views over habits and tasks: the daily dashboard
//! snapshot, streak distribution buckets, and the trailing-week summary.

mod dashboard;
mod weekly;

pub use dashboard::{
    DashboardStats, HabitTotals, StreakBuckets, StreakTotals, TaskTotals,
};
pub use weekly::WeeklySummary;

/// Completion rate in percent, rounded to one decimal. Empty
/// denominators yield 0.
pub(crate) fn completion_rate(done: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((done as f64 / total as f64) * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_rounds_to_one_decimal() {
        assert_eq!(completion_rate(1, 3), 33.3);
        assert_eq!(completion_rate(2, 3), 66.7);
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(5, 5), 100.0);
    }
}
