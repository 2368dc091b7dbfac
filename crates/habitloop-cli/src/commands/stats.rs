//! Statistics commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use habitloop_core::{Config, DashboardStats, Database, StreakBuckets, WeeklySummary};

use super::today;

#[derive(Subcommand)]
pub enum StatsAction {
    /// One-day snapshot of habits, tasks, and streaks
    Dashboard {
        /// Snapshot date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Totals over the trailing seven days
    Weekly,
    /// Habit counts bucketed by streak strength
    Streaks,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Dashboard { date } => {
            let config = Config::load_or_default();
            let stats = DashboardStats::snapshot(
                &db,
                date.unwrap_or_else(today),
                config.tracking.count_archived,
            )?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Weekly => {
            let summary = WeeklySummary::trailing_week(&db, today())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Streaks => {
            let buckets = StreakBuckets::compute(&db)?;
            println!("{}", serde_json::to_string_pretty(&buckets)?);
        }
    }
    Ok(())
}
