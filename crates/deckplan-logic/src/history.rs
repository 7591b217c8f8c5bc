//! Linear undo/redo history.
//!
//! Two LIFO stacks of placement deltas. Committing anything new clears the
//! redo stack; there is no branching.

use serde::{Deserialize, Serialize};

use crate::floor::FloorIndex;
use crate::store::{PlacementRecord, PlacementStore};

/// Snapshot of one placement as recorded in the history.
pub type HistoryEntry = PlacementRecord;

/// A reversible change to the placement store.
///
/// `Placed` and `Removed` hold one entry per floor placement. A unit of a
/// multi-floor component is placed on every target floor at once and is
/// undone as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryAction {
    /// Placements were added.
    Placed(Vec<HistoryEntry>),
    /// Placements were deleted.
    Removed(Vec<HistoryEntry>),
    /// A placement was moved, rotated or resized.
    Replaced {
        before: HistoryEntry,
        after: HistoryEntry,
    },
}

impl HistoryAction {
    /// The action that undoes this one.
    pub fn inverse(&self) -> Self {
        match self {
            HistoryAction::Placed(e) => HistoryAction::Removed(e.clone()),
            HistoryAction::Removed(e) => HistoryAction::Placed(e.clone()),
            HistoryAction::Replaced { before, after } => HistoryAction::Replaced {
                before: *after,
                after: *before,
            },
        }
    }

    /// Floors touched by this action, ascending and without repeats.
    pub fn floors(&self) -> Vec<FloorIndex> {
        let mut floors: Vec<FloorIndex> = match self {
            HistoryAction::Placed(e) | HistoryAction::Removed(e) => {
                e.iter().map(|entry| entry.floor).collect()
            }
            HistoryAction::Replaced { before, after } => vec![before.floor, after.floor],
        };
        floors.sort_unstable();
        floors.dedup();
        floors
    }

    /// Apply the action to a store.
    ///
    /// All-or-nothing: returns `false` and leaves the store untouched if a
    /// placement that should be removed or replaced is no longer there.
    pub fn apply(&self, store: &mut PlacementStore) -> bool {
        match self {
            HistoryAction::Placed(entries) => {
                for e in entries {
                    store.push(e.component, e.placement());
                }
                true
            }
            HistoryAction::Removed(entries) => {
                let mut scratch = store.clone();
                for e in entries {
                    if scratch
                        .remove_matching(e.component, e.floor, e.x, e.y)
                        .is_none()
                    {
                        return false;
                    }
                }
                *store = scratch;
                true
            }
            HistoryAction::Replaced { before, after } => {
                match store.find_matching(before.component, before.floor, before.x, before.y) {
                    Some(i) => store
                        .replace(before.component, i, after.placement())
                        .is_some(),
                    None => false,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<HistoryAction>,
    redo: Vec<HistoryAction>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly committed action. Clears the redo stack.
    pub fn record(&mut self, action: HistoryAction) {
        self.undo.push(action);
        self.redo.clear();
    }

    /// Pop the most recent action for undoing. The caller reverses it and
    /// hands it back through [`History::push_redo`].
    pub fn pop_undo(&mut self) -> Option<HistoryAction> {
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryAction> {
        self.redo.pop()
    }

    pub fn push_redo(&mut self, action: HistoryAction) {
        self.redo.push(action);
    }

    /// Return a redone action to the undo stack without touching redo.
    pub fn push_undo(&mut self, action: HistoryAction) {
        self.undo.push(action);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Placement;

    fn entry(component: usize, x: f64) -> HistoryEntry {
        PlacementRecord::new(component, &Placement::new(1, x, 0.0, 2.0, 2.0))
    }

    #[test]
    fn record_clears_redo() {
        let mut h = History::new();
        h.record(HistoryAction::Placed(vec![entry(0, 0.0)]));
        let a = h.pop_undo().unwrap();
        h.push_redo(a);
        assert!(h.can_redo());
        h.record(HistoryAction::Placed(vec![entry(1, 4.0)]));
        assert!(!h.can_redo());
        assert_eq!(h.undo_len(), 1);
    }

    #[test]
    fn stacks_are_lifo() {
        let mut h = History::new();
        h.record(HistoryAction::Placed(vec![entry(0, 0.0)]));
        h.record(HistoryAction::Placed(vec![entry(1, 4.0)]));
        assert_eq!(h.pop_undo(), Some(HistoryAction::Placed(vec![entry(1, 4.0)])));
        assert_eq!(h.pop_undo(), Some(HistoryAction::Placed(vec![entry(0, 0.0)])));
        assert_eq!(h.pop_undo(), None);
    }

    #[test]
    fn inverse_of_inverse_is_identity() {
        let actions = [
            HistoryAction::Placed(vec![entry(0, 0.0)]),
            HistoryAction::Removed(vec![entry(0, 0.0)]),
            HistoryAction::Replaced {
                before: entry(0, 0.0),
                after: entry(0, 3.0),
            },
        ];
        for a in &actions {
            assert_eq!(&a.inverse().inverse(), a);
        }
    }

    #[test]
    fn apply_then_inverse_restores_store() {
        let mut store = PlacementStore::new();
        store.push(0, Placement::new(1, 0.0, 0.0, 2.0, 2.0));
        let before = store.clone();

        let placed = HistoryAction::Placed(vec![entry(1, 5.0)]);
        assert!(placed.apply(&mut store));
        assert_eq!(store.len(), 2);
        assert!(placed.inverse().apply(&mut store));
        assert_eq!(store, before);

        let moved = HistoryAction::Replaced {
            before: entry(0, 0.0),
            after: entry(0, 6.0),
        };
        assert!(moved.apply(&mut store));
        assert_eq!(store.get(0, 0).unwrap().x, 6.0);
        assert!(moved.inverse().apply(&mut store));
        assert_eq!(store, before);
    }

    #[test]
    fn grouped_removal_is_all_or_nothing() {
        let mut store = PlacementStore::new();
        store.push(0, Placement::new(1, 0.0, 0.0, 2.0, 2.0));
        let before = store.clone();
        let mut missing = entry(0, 0.0);
        missing.floor = 2;
        let removal = HistoryAction::Removed(vec![entry(0, 0.0), missing]);
        assert!(!removal.apply(&mut store));
        assert_eq!(store, before);
    }

    #[test]
    fn floors_are_deduplicated() {
        let mut upper = entry(0, 0.0);
        upper.floor = 3;
        let action = HistoryAction::Placed(vec![upper, entry(0, 0.0), upper]);
        assert_eq!(action.floors(), vec![1, 3]);
    }

    #[test]
    fn removing_missing_placement_reports_failure() {
        let mut store = PlacementStore::new();
        assert!(!HistoryAction::Removed(vec![entry(0, 0.0)]).apply(&mut store));
        let replaced = HistoryAction::Replaced {
            before: entry(0, 0.0),
            after: entry(0, 1.0),
        };
        assert!(!replaced.apply(&mut store));
    }
}
