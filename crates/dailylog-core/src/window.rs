//! Daily window resolution.
//!
//! "Today" starts at local midnight of the caller's instant and is open ended:
//! a log counts as done today when its timestamp is at or after that start.
//! Completion checks, skip-set validity and history grouping all go through
//! this module so they agree on where a day begins.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::routine::RoutineLog;

/// The local calendar day containing a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    date: NaiveDate,
    start: DateTime<Utc>,
}

impl DailyWindow {
    /// Resolve the window containing `now`, in `now`'s own timezone.
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let date = now.date_naive();
        Self {
            date,
            start: local_midnight(date, &now.timezone()),
        }
    }

    /// Local calendar date of this window.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Inclusive lower bound of the window.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start
    }
}

/// Inclusive lower bound of "today" for `now`.
pub fn today_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    DailyWindow::containing(now).start()
}

/// Calendar date of `timestamp` in `tz`.
pub fn local_date<Tz: TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    timestamp.with_timezone(tz).date_naive()
}

/// The log marking `routine_id` done inside `window`, if any.
///
/// With several same-day logs the most recent one wins.
pub fn todays_log<'a>(
    logs: &'a [RoutineLog],
    routine_id: &str,
    window: &DailyWindow,
) -> Option<&'a RoutineLog> {
    logs.iter()
        .filter(|l| l.routine_id == routine_id && window.contains(l.timestamp))
        .max_by_key(|l| l.timestamp)
}

pub fn is_done_today(logs: &[RoutineLog], routine_id: &str, window: &DailyWindow) -> bool {
    logs.iter()
        .any(|l| l.routine_id == routine_id && window.contains(l.timestamp))
}

fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(start) = tz.from_local_datetime(&midnight).earliest() {
        return start.with_timezone(&Utc);
    }
    // Midnight fell into a DST gap; the day starts at its first valid hour.
    (1..24)
        .filter_map(|h| midnight.checked_add_signed(chrono::Duration::hours(h)))
        .find_map(|t| tz.from_local_datetime(&t).earliest())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
