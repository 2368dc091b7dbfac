pub mod config;
pub mod habit;
pub mod stats;
pub mod task;

use chrono::{Local, NaiveDate};

/// Local calendar date; the engine itself never reads the clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
