//! Completion log collection.

use chrono::{DateTime, Utc};

use super::RoutineLog;

/// Completion events, newest insertions first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogStore {
    logs: Vec<RoutineLog>,
}

impl LogStore {
    pub fn new(logs: Vec<RoutineLog>) -> Self {
        Self { logs }
    }

    pub fn as_slice(&self) -> &[RoutineLog] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&RoutineLog> {
        self.logs.iter().find(|l| l.id == id)
    }

    pub fn for_routine<'a>(&'a self, routine_id: &'a str) -> impl Iterator<Item = &'a RoutineLog> + 'a {
        self.logs.iter().filter(move |l| l.routine_id == routine_id)
    }

    /// Record a completion at the front of the collection.
    pub fn insert(&mut self, log: RoutineLog) {
        self.logs.insert(0, log);
    }

    pub fn remove(&mut self, id: &str) -> Option<RoutineLog> {
        let index = self.logs.iter().position(|l| l.id == id)?;
        Some(self.logs.remove(index))
    }

    /// Rewrite the completion instant of an existing log.
    ///
    /// Returns the previous timestamp, or `None` for an unknown id.
    pub fn correct_timestamp(&mut self, id: &str, timestamp: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let log = self.logs.iter_mut().find(|l| l.id == id)?;
        Some(std::mem::replace(&mut log.timestamp, timestamp))
    }

    pub fn into_vec(self) -> Vec<RoutineLog> {
        self.logs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn insert_prepends() {
        let now = Utc::now();
        let mut store = LogStore::default();
        store.insert(RoutineLog::new("l1", "a", now));
        store.insert(RoutineLog::new("l2", "b", now));
        assert_eq!(store.as_slice()[0].id, "l2");
        assert_eq!(store.for_routine("a").count(), 1);
    }

    #[test]
    fn correct_timestamp_rewrites_in_place() {
        let now = Utc::now();
        let earlier = now - Duration::hours(3);
        let mut store = LogStore::new(vec![RoutineLog::new("l1", "a", now)]);
        assert_eq!(store.correct_timestamp("l1", earlier), Some(now));
        assert_eq!(store.get("l1").unwrap().timestamp, earlier);
        assert_eq!(store.correct_timestamp("missing", earlier), None);
    }

    #[test]
    fn remove_unknown_is_none() {
        let mut store = LogStore::default();
        assert!(store.remove("nope").is_none());
    }
}
