//! JSON snapshot of routines and logs.
//!
//! The document shape is `{ "routines": [...], "logs": [...] }`, the same
//! record layout the sync worker stores, so exports can be imported by
//! either side.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::routine::{Routine, RoutineLog};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub routines: Vec<Routine>,
    #[serde(default)]
    pub logs: Vec<RoutineLog>,
}

impl Snapshot {
    pub fn new(routines: Vec<Routine>, logs: Vec<RoutineLog>) -> Self {
        Self { routines, logs }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
