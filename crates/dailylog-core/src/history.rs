//! Completion history views.
//!
//! Logs may reference routines that were deleted since; those entries keep
//! their timestamp and carry no routine.

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::routine::{Routine, RoutineLog};
use crate::window::local_date;

/// Default number of rows in a history listing.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A log joined with the routine it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub log: RoutineLog,
    pub routine: Option<Routine>,
}

impl HistoryEntry {
    pub fn title(&self) -> Option<&str> {
        self.routine.as_ref().map(|r| r.title.as_str())
    }

    pub fn emoji(&self) -> Option<&str> {
        self.routine.as_ref().map(|r| r.emoji.as_str())
    }
}

/// Total completions per routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutineCount {
    pub routine_id: String,
    pub title: String,
    pub count: usize,
}

/// Newest-first history, optionally restricted to one routine.
pub fn history(
    routines: &[Routine],
    logs: &[RoutineLog],
    routine_filter: Option<&str>,
    limit: usize,
) -> Vec<HistoryEntry> {
    let mut selected: Vec<&RoutineLog> = logs
        .iter()
        .filter(|l| routine_filter.map_or(true, |id| l.routine_id == id))
        .collect();
    selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    selected
        .into_iter()
        .take(limit)
        .map(|log| join(routines, log))
        .collect()
}

/// All logs grouped by local calendar date, newest date first.
pub fn history_by_day<Tz: TimeZone>(
    routines: &[Routine],
    logs: &[RoutineLog],
    tz: &Tz,
) -> Vec<(NaiveDate, Vec<HistoryEntry>)> {
    let mut days: BTreeMap<NaiveDate, Vec<&RoutineLog>> = BTreeMap::new();
    for log in logs {
        days.entry(local_date(log.timestamp, tz)).or_default().push(log);
    }

    days.into_iter()
        .rev()
        .map(|(date, mut day_logs)| {
            day_logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let entries = day_logs.into_iter().map(|log| join(routines, log)).collect();
            (date, entries)
        })
        .collect()
}

/// Completion totals per routine in global order, omitting unused routines.
pub fn completion_counts(routines: &[Routine], logs: &[RoutineLog]) -> Vec<RoutineCount> {
    let mut ordered: Vec<&Routine> = routines.iter().collect();
    ordered.sort_by_key(|r| r.order);

    ordered
        .into_iter()
        .filter_map(|routine| {
            let count = logs.iter().filter(|l| l.routine_id == routine.id).count();
            (count > 0).then(|| RoutineCount {
                routine_id: routine.id.clone(),
                title: routine.title.clone(),
                count,
            })
        })
        .collect()
}

fn join(routines: &[Routine], log: &RoutineLog) -> HistoryEntry {
    HistoryEntry {
        log: log.clone(),
        routine: routines.iter().find(|r| r.id == log.routine_id).cloned(),
    }
}
