mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, NotificationsConfig, TrackingConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory for database and config files.
///
/// `HABITLOOP_DATA_DIR` overrides the location outright (used by tests).
/// Otherwise `~/.config/habitloop[-dev]/` based on HABITLOOP_ENV; set
/// HABITLOOP_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = if let Ok(custom) = std::env::var("HABITLOOP_DATA_DIR") {
        PathBuf::from(custom)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("HABITLOOP_ENV").unwrap_or_else(|_| "production".to_string());

        if env == "dev" {
            base_dir.join("habitloop-dev")
        } else {
            base_dir.join("habitloop")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
