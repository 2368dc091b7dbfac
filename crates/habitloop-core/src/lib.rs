//! # Habitloop Core Library
//!
//! Core business logic for the Habitloop habit tracker. It implements a
//! CLI-first philosophy where all operations are available via a
//! standalone CLI binary layered over this library.
//!
//! ## Architecture
//!
//! - **Streak Engine**: pure computation over a habit's completion-date
//!   set; completing the day after the last completion extends the
//!   streak, any other gap restarts it, and undoing recomputes from
//!   history instead of decrementing
//! - **Storage**: SQLite-based habit/task/completion storage and
//!   TOML-based configuration
//! - **Stats**: dashboard snapshot, streak buckets, weekly summary
//!
//! Every operation takes its calendar date from the caller, so tests can
//! drive fixed dates instead of the wall clock.
//!
//! ## Key Components
//!
//! - [`Database`]: habit, task, and completion persistence; hosts the
//!   transactional complete/uncomplete operations
//! - [`habit::streak`]: the streak computation itself
//! - [`Config`]: application configuration management

pub mod error;
pub mod habit;
pub mod stats;
pub mod storage;
pub mod task;

pub use error::{
    ConfigError, CoreError, DatabaseError, HabitError, Result, TaskError, ValidationError,
};
pub use habit::{CompletionOutcome, CompletionRecord, Habit, HabitEntry, UncompleteOutcome};
pub use stats::{DashboardStats, StreakBuckets, WeeklySummary};
pub use storage::{data_dir, Config, Database};
pub use task::DailyTask;
