//! Per-day and per-session focus state.
//!
//! [`SkipSet`] lives for one calendar day and is persisted with its date.
//! [`PostponeQueue`] lives for one process and deliberately has no serde
//! implementation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Routines excluded from today's focus queue.
///
/// Reads always pass the current local date; a set recorded for any other
/// date reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipSet {
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    ids: BTreeSet<String>,
}

impl SkipSet {
    /// An empty set recorded for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ids: BTreeSet::new(),
        }
    }

    pub fn with_ids<I, S>(date: NaiveDate, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            date: Some(date),
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.date == Some(today)
    }

    /// Ids skipped on `today`; empty when the set is stale.
    pub fn ids_for(&self, today: NaiveDate) -> impl Iterator<Item = &str> {
        let current = self.is_current(today);
        self.ids.iter().filter(move |_| current).map(String::as_str)
    }

    pub fn contains(&self, today: NaiveDate, id: &str) -> bool {
        self.is_current(today) && self.ids.contains(id)
    }

    /// Skip `id` for `today`, discarding a set left over from another day.
    pub fn skip(&mut self, today: NaiveDate, id: impl Into<String>) {
        if !self.is_current(today) {
            if self.date.is_some() {
                debug!(stale = ?self.date, %today, "resetting stale skip set");
            }
            self.date = Some(today);
            self.ids.clear();
        }
        self.ids.insert(id.into());
    }

    /// Drop an id, e.g. after its routine was deleted.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }
}

/// Routines deferred during this session, oldest deferral first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostponeQueue {
    ids: Vec<String>,
}

impl PostponeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `id` to the back of the queue.
    pub fn postpone(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.ids.retain(|queued| *queued != id);
        self.ids.push(id);
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|queued| queued != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|queued| queued == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Ephemeral state the focus selector reads alongside routines and logs.
#[derive(Debug, Clone, Default)]
pub struct DailyState {
    pub skipped: SkipSet,
    pub postponed: PostponeQueue,
}

impl DailyState {
    /// Fresh session state around a restored skip set.
    pub fn restore(skipped: SkipSet) -> Self {
        Self {
            skipped,
            postponed: PostponeQueue::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn postpone_rotates_to_back() {
        let mut queue = PostponeQueue::new();
        queue.postpone("a");
        queue.postpone("b");
        queue.postpone("a");
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn remove_reports_membership() {
        let mut queue = PostponeQueue::new();
        queue.postpone("a");
        assert!(queue.remove("a"));
        assert!(!queue.remove("a"));
        assert!(queue.is_empty());
    }

    #[test]
    fn stale_skip_set_reads_empty() {
        let set = SkipSet::with_ids(day(15), ["a", "b"]);
        assert!(set.contains(day(15), "a"));
        assert!(!set.contains(day(16), "a"));
        assert_eq!(set.ids_for(day(16)).count(), 0);
    }

    #[test]
    fn skipping_on_new_day_discards_old_ids() {
        let mut set = SkipSet::with_ids(day(15), ["a"]);
        set.skip(day(16), "b");
        assert_eq!(set.date(), Some(day(16)));
        assert_eq!(set.ids_for(day(16)).collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn default_skip_set_is_never_current() {
        let set = SkipSet::default();
        assert!(!set.is_current(day(16)));
    }

    #[test]
    fn skip_set_serializes_with_date() {
        let set = SkipSet::with_ids(day(16), ["a"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"date":"2026-10-16","ids":["a"]}"#);
        assert_eq!(serde_json::from_str::<SkipSet>(&json).unwrap(), set);
    }
}
