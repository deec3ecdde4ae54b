//! Manual ordering of routines.
//!
//! Users reorder routines inside a single category, but ranks are global:
//! the `order` field sorts *all* routines. A move is therefore resolved in
//! two steps, view-local index to routine identity, then identity to global
//! index, before the global sequence is spliced and renumbered.
//!
//! # Invariants
//! - After any move, ranks across all routines are exactly `0..n`.
//! - Routines outside the edited category keep their relative order.
//! - A target index outside the view is a no-op, never a wrap.

use tracing::{debug, trace};

use crate::routine::{Category, Routine};

/// Direction of a single-step keyboard move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Routines of `category`, sorted by `order`.
pub fn category_view(routines: &[Routine], category: Category) -> Vec<Routine> {
    let mut view: Vec<Routine> = routines
        .iter()
        .filter(|r| r.category == category)
        .cloned()
        .collect();
    view.sort_by_key(|r| r.order);
    view
}

/// Move the routine at `from` in `view` to slot `to` of the same view.
///
/// `routines` is the complete routine set; `view` is the category-filtered,
/// order-sorted list the caller is editing. Returns the full reordered and
/// renumbered sequence, or `None` when the move is a no-op: either index
/// outside the view, `from == to`, or a view entry that no longer exists in
/// `routines`.
pub fn reorder(routines: &[Routine], view: &[Routine], from: isize, to: isize) -> Option<Vec<Routine>> {
    let (Some(from), Some(to)) = (view_index(view, from), view_index(view, to)) else {
        debug!(from, to, view_len = view.len(), "reorder ignored: index outside view");
        return None;
    };
    if from == to {
        return None;
    }

    let mut global = routines.to_vec();
    global.sort_by_key(|r| r.order);

    let from_id = &view[from].id;
    let to_id = &view[to].id;
    let (Some(from_global), Some(to_global)) = (
        global.iter().position(|r| &r.id == from_id),
        global.iter().position(|r| &r.id == to_id),
    ) else {
        debug!(%from_id, %to_id, "reorder ignored: view is stale");
        return None;
    };

    let moved = global.remove(from_global);
    global.insert(to_global, moved);
    renumber(&mut global);

    trace!(%from_id, from_global, to_global, "routine moved");
    Some(global)
}

/// Move the routine at `index` of `category`'s view one slot up or down.
pub fn nudge(routines: &[Routine], category: Category, index: usize, direction: Direction) -> Option<Vec<Routine>> {
    let view = category_view(routines, category);
    let from = isize::try_from(index).ok()?;
    let to = match direction {
        Direction::Up => from - 1,
        Direction::Down => from + 1,
    };
    reorder(routines, &view, from, to)
}

/// Assign `order = index` to every routine in sequence.
pub fn renumber(routines: &mut [Routine]) {
    for (index, routine) in routines.iter_mut().enumerate() {
        routine.order = index;
    }
}

/// Stable-sort by the stored ranks, then renumber densely.
pub fn normalize_order(mut routines: Vec<Routine>) -> Vec<Routine> {
    routines.sort_by_key(|r| r.order);
    renumber(&mut routines);
    routines
}

/// Whether the ranks are exactly `0..n` with no duplicates.
pub fn is_dense(routines: &[Routine]) -> bool {
    let mut seen = vec![false; routines.len()];
    for routine in routines {
        match seen.get_mut(routine.order) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

fn view_index(view: &[Routine], index: isize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < view.len())
}
