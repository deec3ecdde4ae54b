//! SQLite-based routine and log storage.
//!
//! Provides persistent storage for:
//! - Routine definitions and their global order
//! - Completion logs
//! - Key-value store for application state (today's skip set)

use chrono::{TimeZone, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

use super::migrations;
use super::{data_dir, RoutineRepository, SkipRepository, Snapshot};
use crate::error::{DatabaseError, Result};
use crate::focus::SkipSet;
use crate::routine::{Category, Routine, RoutineLog};

const SKIPPED_TODAY_KEY: &str = "skipped_today";

/// SQLite database backing the routine and log stores.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/dailylog.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("dailylog.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and dry runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    fn load_routines(&self) -> Result<Vec<Routine>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, emoji, category, sort_order FROM routines ORDER BY sort_order, rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut routines = Vec::new();
        for row in rows {
            let (id, title, emoji, category, order) = row?;
            // Unknown categories fall back to the default band.
            let category = category.parse::<Category>().unwrap_or_default();
            let order = usize::try_from(order).map_err(|_| DatabaseError::CorruptRow {
                table: "routines".into(),
                message: format!("negative sort_order {order} for {id}"),
            })?;
            routines.push(Routine {
                id,
                title,
                emoji,
                category,
                order,
            });
        }
        Ok(routines)
    }

    fn load_logs(&self) -> Result<Vec<RoutineLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, routine_id, timestamp, note FROM logs ORDER BY timestamp DESC, rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut logs = Vec::new();
        for row in rows {
            let (id, routine_id, millis, note) = row?;
            let timestamp = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
                DatabaseError::CorruptRow {
                    table: "logs".into(),
                    message: format!("timestamp {millis} out of range for {id}"),
                }
            })?;
            logs.push(RoutineLog {
                id,
                routine_id,
                timestamp,
                note,
            });
        }
        Ok(logs)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl RoutineRepository for Database {
    fn load(&self) -> Result<Snapshot> {
        let snapshot = Snapshot::new(self.load_routines()?, self.load_logs()?);
        debug!(
            routines = snapshot.routines.len(),
            logs = snapshot.logs.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Replace both tables with the given collections in one transaction.
    fn save(&self, routines: &[Routine], logs: &[RoutineLog]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM routines", [])?;
        tx.execute("DELETE FROM logs", [])?;
        {
            let mut insert_routine = tx.prepare(
                "INSERT INTO routines (id, title, emoji, category, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for r in routines {
                insert_routine.execute(params![
                    r.id,
                    r.title,
                    r.emoji,
                    r.category.as_str(),
                    r.order as i64,
                ])?;
            }

            let mut insert_log = tx.prepare(
                "INSERT INTO logs (id, routine_id, timestamp, note) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for l in logs {
                insert_log.execute(params![
                    l.id,
                    l.routine_id,
                    l.timestamp.timestamp_millis(),
                    l.note,
                ])?;
            }
        }
        tx.commit()?;
        debug!(routines = routines.len(), logs = logs.len(), "saved snapshot");
        Ok(())
    }
}

impl SkipRepository for Database {
    fn load_skipped(&self) -> Result<SkipSet> {
        match self.kv_get(SKIPPED_TODAY_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(SkipSet::default()),
        }
    }

    fn save_skipped(&self, skipped: &SkipSet) -> Result<()> {
        self.kv_set(SKIPPED_TODAY_KEY, &serde_json::to_string(skipped)?)
    }
}
