//! Focus queue selection.
//!
//! Given one category's routines, the logs, today's skip set and the session's
//! postpone queue, [`select_focus`] derives completion counts and the single
//! routine to present next. It is recomputed from scratch on every change.
//!
//! # Selection rule
//! 1. The earliest-ordered incomplete routine that has not been postponed
//!    this session.
//! 2. Otherwise the first id in the postpone queue that is still incomplete,
//!    so repeated postponement rotates through the pending routines.
//! 3. Otherwise nothing: every active routine is done.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::collections::HashSet;

use crate::routine::{Routine, RoutineLog};
use crate::window::DailyWindow;

pub mod state;

pub use state::{DailyState, PostponeQueue, SkipSet};

/// Derived view of one category's focus queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusSnapshot {
    pub completed_count: usize,
    pub total_count: usize,
    pub next_routine_id: Option<String>,
    /// Category routines minus today's skips, in `order` sequence.
    pub active_routines: Vec<Routine>,
    /// Ids of active routines done today, in `order` sequence.
    pub completed_ids: Vec<String>,
}

impl FocusSnapshot {
    /// Share of active routines done today; `None` when nothing is scheduled.
    pub fn completion_ratio(&self) -> Option<f64> {
        (self.total_count > 0).then(|| self.completed_count as f64 / self.total_count as f64)
    }

    pub fn is_done(&self, id: &str) -> bool {
        self.completed_ids.iter().any(|c| c == id)
    }

    /// Active routines still pending today.
    pub fn remaining(&self) -> impl Iterator<Item = &Routine> {
        self.active_routines.iter().filter(|r| !self.is_done(&r.id))
    }

    /// Active routines already done today.
    pub fn completed(&self) -> impl Iterator<Item = &Routine> {
        self.active_routines.iter().filter(|r| self.is_done(&r.id))
    }

    pub fn next_routine(&self) -> Option<&Routine> {
        let id = self.next_routine_id.as_deref()?;
        self.active_routines.iter().find(|r| r.id == id)
    }
}

/// Compute the focus queue for `category_routines` at `now`.
pub fn select_focus<Tz: TimeZone>(
    category_routines: &[Routine],
    logs: &[RoutineLog],
    skipped: &SkipSet,
    postponed: &PostponeQueue,
    now: &DateTime<Tz>,
) -> FocusSnapshot {
    let window = DailyWindow::containing(now);
    let today = window.date();

    let mut active: Vec<Routine> = category_routines
        .iter()
        .filter(|r| !skipped.contains(today, &r.id))
        .cloned()
        .collect();
    active.sort_by_key(|r| r.order);

    let done_ids: HashSet<&str> = logs
        .iter()
        .filter(|l| window.contains(l.timestamp))
        .map(|l| l.routine_id.as_str())
        .collect();

    let (completed, incomplete): (Vec<&Routine>, Vec<&Routine>) =
        active.iter().partition(|r| done_ids.contains(r.id.as_str()));

    let next_routine_id = incomplete
        .iter()
        .find(|r| !postponed.contains(&r.id))
        .map(|r| r.id.clone())
        .or_else(|| {
            postponed
                .iter()
                .find(|id| incomplete.iter().any(|r| r.id == *id))
                .map(str::to_string)
        });
    let completed_ids: Vec<String> = completed.iter().map(|r| r.id.clone()).collect();

    FocusSnapshot {
        completed_count: completed_ids.len(),
        total_count: active.len(),
        next_routine_id,
        completed_ids,
        active_routines: active,
    }
}
