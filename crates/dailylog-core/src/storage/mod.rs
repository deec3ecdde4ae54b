//! Persistence collaborators.
//!
//! The engine never calls into this module; the session owner loads a
//! [`Snapshot`] and skip set at startup and saves after each mutation.
//! The postpone queue has no storage path on purpose.

mod config;
pub mod database;
pub mod migrations;
pub mod snapshot;

pub use config::{Config, HistoryConfig, NewRoutineConfig};
pub use database::Database;
pub use snapshot::Snapshot;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::focus::SkipSet;
use crate::routine::{Routine, RoutineLog};

/// Load and save the routine and log collections as one unit.
pub trait RoutineRepository {
    fn load(&self) -> Result<Snapshot>;

    fn save(&self, routines: &[Routine], logs: &[RoutineLog]) -> Result<()>;
}

/// Load and save today's skip set together with its date.
pub trait SkipRepository {
    fn load_skipped(&self) -> Result<SkipSet>;

    fn save_skipped(&self, skipped: &SkipSet) -> Result<()>;
}

/// Returns the dailylog data directory, creating it when missing.
///
/// `DAILYLOG_DATA_DIR` overrides the location entirely. Otherwise it is
/// `~/.config/dailylog`, or `~/.config/dailylog-dev` with `DAILYLOG_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("DAILYLOG_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("DAILYLOG_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("dailylog-dev")
            } else {
                base_dir.join("dailylog")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
