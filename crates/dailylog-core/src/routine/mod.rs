//! Routine and completion-log records.
//!
//! Records serialize with camelCase field names and millisecond epoch
//! timestamps so that snapshots written by older clients load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub mod log_store;
pub mod store;

pub use log_store::LogStore;
pub use store::RoutineStore;

/// Daily time band a routine belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Morning,
    Afternoon,
    Evening,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Morning, Category::Afternoon, Category::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Morning => "Morning",
            Category::Afternoon => "Afternoon",
            Category::Evening => "Evening",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Morning
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Category::Morning),
            "afternoon" => Ok(Category::Afternoon),
            "evening" => Ok(Category::Evening),
            _ => Err(ValidationError::UnknownCategory(s.to_string())),
        }
    }
}

/// A user-defined recurring habit.
///
/// `order` ranks the routine among *all* routines, not just those of its
/// category. Across a store the ranks form the dense sequence `0..n`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub order: usize,
}

impl Routine {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        emoji: impl Into<String>,
        category: Category,
        order: usize,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            emoji: emoji.into(),
            category,
            order,
        }
    }
}

/// One completion of a routine.
///
/// `routine_id` is a weak reference: the routine may have been deleted since.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoutineLog {
    pub id: String,
    pub routine_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RoutineLog {
    pub fn new(id: impl Into<String>, routine_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            routine_id: routine_id.into(),
            timestamp,
            note: None,
        }
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}
