//! Session context owning the routine store, log store and daily state.
//!
//! All user-level events go through a [`Session`]: it validates ids, applies
//! the mutation, and leaves persistence to the caller via
//! [`Session::snapshot`] and [`Session::skipped`]. Derived views (focus queue,
//! category views, history) are recomputed from the current state on every
//! call.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::clock::{Clock, IdGenerator};
use crate::error::{CoreError, Result, ValidationError};
use crate::focus::{self, DailyState, FocusSnapshot, PostponeQueue, SkipSet};
use crate::history::{self, HistoryEntry, RoutineCount};
use crate::ordering::{self, Direction};
use crate::routine::{Category, LogStore, Routine, RoutineLog, RoutineStore};
use crate::storage::Snapshot;
use crate::window::{self, DailyWindow};

/// Outcome of [`Session::toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Completed(RoutineLog),
    Uncompleted(RoutineLog),
}

pub struct Session<C: Clock, G: IdGenerator> {
    routines: RoutineStore,
    logs: LogStore,
    daily: DailyState,
    clock: C,
    ids: G,
}

impl<C: Clock, G: IdGenerator> Session<C, G> {
    /// Start a session from persisted state. The postpone queue starts empty.
    pub fn new(snapshot: Snapshot, skipped: SkipSet, clock: C, ids: G) -> Self {
        Self {
            routines: RoutineStore::new(snapshot.routines),
            logs: LogStore::new(snapshot.logs),
            daily: DailyState::restore(skipped),
            clock,
            ids,
        }
    }

    pub fn routines(&self) -> &RoutineStore {
        &self.routines
    }

    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    /// Skip set to persist; keyed by its own date.
    pub fn skipped(&self) -> &SkipSet {
        &self.daily.skipped
    }

    pub fn postponed(&self) -> &PostponeQueue {
        &self.daily.postponed
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Routines and logs to hand to the storage collaborator.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.routines.as_slice().to_vec(), self.logs.as_slice().to_vec())
    }

    fn window(&self) -> DailyWindow {
        DailyWindow::containing(&self.clock.now())
    }

    fn require_routine(&self, id: &str) -> Result<()> {
        if self.routines.contains(id) {
            Ok(())
        } else {
            Err(CoreError::RoutineNotFound(id.to_string()))
        }
    }

    fn routine_mut(&mut self, id: &str) -> Result<&mut Routine> {
        self.routines
            .get_mut(id)
            .ok_or_else(|| CoreError::RoutineNotFound(id.to_string()))
    }

    // === Routine management ===

    /// Create a routine at the end of the global order.
    pub fn add_routine(&mut self, title: &str, emoji: &str, category: Category) -> Result<Routine> {
        let title = non_blank(title)?;
        let routine = Routine::new(self.ids.next_id(), title, emoji, category, 0);
        let added = self.routines.push(routine).clone();
        info!(id = %added.id, category = %added.category, order = added.order, "routine added");
        Ok(added)
    }

    pub fn rename(&mut self, id: &str, title: &str) -> Result<()> {
        let title = non_blank(title)?;
        self.routine_mut(id)?.title = title;
        Ok(())
    }

    pub fn set_emoji(&mut self, id: &str, emoji: &str) -> Result<()> {
        self.routine_mut(id)?.emoji = emoji.to_string();
        Ok(())
    }

    /// Move a routine to another category, keeping its global rank.
    pub fn set_category(&mut self, id: &str, category: Category) -> Result<()> {
        self.routine_mut(id)?.category = category;
        Ok(())
    }

    /// Delete a routine. Its logs stay behind as dangling history.
    pub fn delete_routine(&mut self, id: &str) -> Result<Routine> {
        let removed = self
            .routines
            .remove(id)
            .ok_or_else(|| CoreError::RoutineNotFound(id.to_string()))?;
        self.daily.postponed.remove(id);
        self.daily.skipped.remove(id);
        info!(id, "routine deleted");
        Ok(removed)
    }

    pub fn category_view(&self, category: Category) -> Vec<Routine> {
        self.routines.category_view(category)
    }

    /// Move the routine at view index `from` to view index `to` within
    /// `category`. Returns `false` when the move is a no-op.
    pub fn reorder(&mut self, category: Category, from: isize, to: isize) -> bool {
        let view = self.routines.category_view(category);
        match ordering::reorder(self.routines.as_slice(), &view, from, to) {
            Some(reordered) => {
                self.routines.replace(reordered);
                debug!(%category, from, to, "routines reordered");
                true
            }
            None => false,
        }
    }

    pub fn move_up(&mut self, category: Category, index: usize) -> bool {
        self.nudge(category, index, Direction::Up)
    }

    pub fn move_down(&mut self, category: Category, index: usize) -> bool {
        self.nudge(category, index, Direction::Down)
    }

    fn nudge(&mut self, category: Category, index: usize, direction: Direction) -> bool {
        match ordering::nudge(self.routines.as_slice(), category, index, direction) {
            Some(reordered) => {
                self.routines.replace(reordered);
                true
            }
            None => false,
        }
    }

    // === Focus queue ===

    /// Focus queue for `category` at the clock's current instant.
    pub fn focus(&self, category: Category) -> FocusSnapshot {
        focus::select_focus(
            &self.routines.category_view(category),
            self.logs.as_slice(),
            &self.daily.skipped,
            &self.daily.postponed,
            &self.clock.now(),
        )
    }

    /// Send a routine to the back of this session's rotation.
    pub fn postpone(&mut self, id: &str) -> Result<()> {
        self.require_routine(id)?;
        self.daily.postponed.postpone(id);
        debug!(id, queued = self.daily.postponed.len(), "routine postponed");
        Ok(())
    }

    /// Exclude a routine from today's queue and from the postpone rotation.
    pub fn skip_today(&mut self, id: &str) -> Result<()> {
        self.require_routine(id)?;
        let today = self.window().date();
        self.daily.skipped.skip(today, id);
        self.daily.postponed.remove(id);
        debug!(id, %today, "routine skipped for today");
        Ok(())
    }

    // === Completion ===

    pub fn is_done_today(&self, id: &str) -> bool {
        window::is_done_today(self.logs.as_slice(), id, &self.window())
    }

    pub fn todays_log(&self, id: &str) -> Option<&RoutineLog> {
        window::todays_log(self.logs.as_slice(), id, &self.window())
    }

    /// Record today's completion of a routine.
    ///
    /// A routine already done today keeps its existing log.
    pub fn complete(&mut self, id: &str, note: Option<String>) -> Result<RoutineLog> {
        self.require_routine(id)?;
        self.daily.postponed.remove(id);
        if let Some(existing) = self.todays_log(id) {
            debug!(id, log = %existing.id, "routine already done today");
            return Ok(existing.clone());
        }

        let timestamp = self.clock.now().with_timezone(&Utc);
        let log = RoutineLog::new(self.ids.next_id(), id, timestamp).with_note(note);
        self.logs.insert(log.clone());
        info!(id, log = %log.id, "routine completed");
        Ok(log)
    }

    /// Remove today's completion of a routine, if any.
    ///
    /// Works for deleted routines too, since only the log is touched.
    pub fn uncomplete(&mut self, id: &str) -> Option<RoutineLog> {
        let log_id = self.todays_log(id)?.id.clone();
        let removed = self.logs.remove(&log_id)?;
        info!(id, log = %removed.id, "routine uncompleted");
        Some(removed)
    }

    /// Complete when not done today, otherwise uncomplete.
    pub fn toggle(&mut self, id: &str) -> Result<Toggle> {
        match self.uncomplete(id) {
            Some(removed) => Ok(Toggle::Uncompleted(removed)),
            None => self.complete(id, None).map(Toggle::Completed),
        }
    }

    /// Rewrite the instant of an existing log.
    pub fn correct_timestamp(&mut self, log_id: &str, timestamp: DateTime<Utc>) -> Result<()> {
        let previous = self
            .logs
            .correct_timestamp(log_id, timestamp)
            .ok_or_else(|| CoreError::LogNotFound(log_id.to_string()))?;
        info!(log = log_id, %previous, %timestamp, "log timestamp corrected");
        Ok(())
    }

    // === History ===

    pub fn history(&self, routine_filter: Option<&str>, limit: usize) -> Vec<HistoryEntry> {
        history::history(self.routines.as_slice(), self.logs.as_slice(), routine_filter, limit)
    }

    /// Logs grouped by calendar date in the clock's timezone.
    pub fn history_by_day(&self) -> Vec<(chrono::NaiveDate, Vec<HistoryEntry>)> {
        let tz = self.clock.now().timezone();
        history::history_by_day(self.routines.as_slice(), self.logs.as_slice(), &tz)
    }

    pub fn completion_counts(&self) -> Vec<RoutineCount> {
        history::completion_counts(self.routines.as_slice(), self.logs.as_slice())
    }
}

fn non_blank(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankTitle.into());
    }
    Ok(trimmed.to_string())
}
