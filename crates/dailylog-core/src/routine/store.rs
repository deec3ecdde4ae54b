//! Ordered collection of routine definitions.

use super::{Category, Routine};
use crate::ordering;

/// Routines held in global `order` sequence.
///
/// Every constructor and mutation leaves the ranks dense (`0..n`), so the
/// position of a routine in [`RoutineStore::as_slice`] always equals its
/// `order`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutineStore {
    routines: Vec<Routine>,
}

impl RoutineStore {
    /// Build a store from loaded routines, repairing gaps and duplicate ranks.
    pub fn new(routines: Vec<Routine>) -> Self {
        Self {
            routines: ordering::normalize_order(routines),
        }
    }

    pub fn as_slice(&self) -> &[Routine] {
        &self.routines
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Routine> {
        self.routines.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Routine> {
        self.routines.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Routine> {
        self.routines.iter_mut().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Routines of one category, sorted by `order`.
    pub fn category_view(&self, category: Category) -> Vec<Routine> {
        ordering::category_view(&self.routines, category)
    }

    /// Append a routine at the end of the global order.
    pub fn push(&mut self, mut routine: Routine) -> &Routine {
        routine.order = self.routines.len();
        self.routines.push(routine);
        &self.routines[self.routines.len() - 1]
    }

    /// Remove a routine and close the gap it leaves in the ranks.
    pub fn remove(&mut self, id: &str) -> Option<Routine> {
        let index = self.routines.iter().position(|r| r.id == id)?;
        let removed = self.routines.remove(index);
        ordering::renumber(&mut self.routines);
        Some(removed)
    }

    /// Swap in a sequence produced by the ordering engine.
    pub fn replace(&mut self, routines: Vec<Routine>) {
        self.routines = ordering::normalize_order(routines);
    }

    pub fn into_vec(self) -> Vec<Routine> {
        self.routines
    }
}
