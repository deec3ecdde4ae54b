//! Subcommand handlers and the shared open/persist cycle.

pub mod config;
pub mod data;
pub mod focus;
pub mod log;
pub mod routine;

use dailylog_core::{
    Database, RoutineRepository, Session, SkipRepository, SystemClock, UuidGenerator,
};
use tracing::debug;

pub type CliSession = Session<SystemClock, UuidGenerator>;

/// A session loaded from the on-disk database.
pub struct Workspace {
    db: Database,
    pub session: CliSession,
}

impl Workspace {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open()?;
        let session = Session::new(db.load()?, db.load_skipped()?, SystemClock, UuidGenerator);
        debug!(
            routines = session.routines().len(),
            logs = session.logs().len(),
            "workspace opened"
        );
        Ok(Self { db, session })
    }

    /// Write routines, logs and the skip set back. Postponement stays in memory.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = self.session.snapshot();
        self.db.save(&snapshot.routines, &snapshot.logs)?;
        self.db.save_skipped(self.session.skipped())?;
        Ok(())
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
