//! Placement store: the single source of truth for what sits where.
//!
//! Placements are kept as an ordered list per component index. Multi-unit
//! and multi-floor components simply have several entries in their list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::ComponentIndex;
use crate::floor::FloorIndex;
use crate::overlap::Rect;

/// One rectangle occupying one floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub floor: FloorIndex,
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub width: f64,
}

impl Placement {
    pub fn new(floor: FloorIndex, x: f64, y: f64, length: f64, width: f64) -> Self {
        Self {
            floor,
            x,
            y,
            length,
            width,
        }
    }

    pub fn from_rect(floor: FloorIndex, rect: Rect) -> Self {
        Self::new(floor, rect.x, rect.y, rect.length, rect.width)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.length, self.width)
    }
}

/// A placement tagged with its owning component.
///
/// Exact snapshot used by the history stacks and by layout snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub component: ComponentIndex,
    pub floor: FloorIndex,
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub width: f64,
}

impl PlacementRecord {
    pub fn new(component: ComponentIndex, placement: &Placement) -> Self {
        Self {
            component,
            floor: placement.floor,
            x: placement.x,
            y: placement.y,
            length: placement.length,
            width: placement.width,
        }
    }

    pub fn placement(&self) -> Placement {
        Placement::new(self.floor, self.x, self.y, self.length, self.width)
    }
}

/// Host-facing snapshot of the whole store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub placements: Vec<PlacementRecord>,
}

/// Map from component index to the placements it occupies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementStore {
    by_component: BTreeMap<ComponentIndex, Vec<Placement>>,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a placement to the end of the component's list.
    /// Returns its index in that list.
    pub fn push(&mut self, component: ComponentIndex, placement: Placement) -> usize {
        let list = self.by_component.entry(component).or_default();
        list.push(placement);
        list.len() - 1
    }

    pub fn get(&self, component: ComponentIndex, placement_index: usize) -> Option<&Placement> {
        self.by_component
            .get(&component)
            .and_then(|list| list.get(placement_index))
    }

    /// Overwrite a placement in place, keeping its list position.
    pub fn replace(
        &mut self,
        component: ComponentIndex,
        placement_index: usize,
        placement: Placement,
    ) -> Option<Placement> {
        let slot = self
            .by_component
            .get_mut(&component)
            .and_then(|list| list.get_mut(placement_index))?;
        Some(std::mem::replace(slot, placement))
    }

    pub fn remove_at(
        &mut self,
        component: ComponentIndex,
        placement_index: usize,
    ) -> Option<Placement> {
        let list = self.by_component.get_mut(&component)?;
        if placement_index >= list.len() {
            return None;
        }
        let removed = list.remove(placement_index);
        if list.is_empty() {
            self.by_component.remove(&component);
        }
        Some(removed)
    }

    /// Position of the first placement matching `{component, floor, x, y}` exactly.
    pub fn find_matching(
        &self,
        component: ComponentIndex,
        floor: FloorIndex,
        x: f64,
        y: f64,
    ) -> Option<usize> {
        self.placements_of(component)
            .iter()
            .position(|p| p.floor == floor && p.x == x && p.y == y)
    }

    /// Remove the first placement matching `{component, floor, x, y}` exactly.
    ///
    /// Ambiguous if two units share that exact tuple; the earliest wins.
    pub fn remove_matching(
        &mut self,
        component: ComponentIndex,
        floor: FloorIndex,
        x: f64,
        y: f64,
    ) -> Option<Placement> {
        let index = self.find_matching(component, floor, x, y)?;
        self.remove_at(component, index)
    }

    pub fn placements_of(&self, component: ComponentIndex) -> &[Placement] {
        self.by_component
            .get(&component)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count_of(&self, component: ComponentIndex) -> usize {
        self.placements_of(component).len()
    }

    /// Highest number of placements the component has on any single floor.
    pub fn max_per_floor(&self, component: ComponentIndex) -> usize {
        let mut per_floor: BTreeMap<FloorIndex, usize> = BTreeMap::new();
        for p in self.placements_of(component) {
            *per_floor.entry(p.floor).or_default() += 1;
        }
        per_floor.values().copied().max().unwrap_or(0)
    }

    /// Every placement on `floor` as `(component, placement_index, placement)`.
    pub fn on_floor(
        &self,
        floor: FloorIndex,
    ) -> impl Iterator<Item = (ComponentIndex, usize, &Placement)> + '_ {
        self.iter().filter(move |(_, _, p)| p.floor == floor)
    }

    /// Every placement as `(component, placement_index, placement)`.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentIndex, usize, &Placement)> + '_ {
        self.by_component.iter().flat_map(|(&component, list)| {
            list.iter()
                .enumerate()
                .map(move |(i, placement)| (component, i, placement))
        })
    }

    /// Distinct floors that hold at least one placement.
    pub fn floors(&self) -> Vec<FloorIndex> {
        let mut floors: Vec<FloorIndex> = self.iter().map(|(_, _, p)| p.floor).collect();
        floors.sort_unstable();
        floors.dedup();
        floors
    }

    pub fn len(&self) -> usize {
        self.by_component.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_component.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_component.clear();
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            placements: self
                .iter()
                .map(|(component, _, p)| PlacementRecord::new(component, p))
                .collect(),
        }
    }

    /// Rebuild a store from a snapshot, keeping per-component order.
    pub fn from_snapshot(snapshot: &LayoutSnapshot) -> Self {
        let mut store = Self::default();
        for record in &snapshot.placements {
            store.push(record.component, record.placement());
        }
        store
    }

    /// All records sorted for order-insensitive comparison.
    pub fn sorted_records(&self) -> Vec<PlacementRecord> {
        let mut records = self.snapshot().placements;
        records.sort_by(|a, b| {
            (a.component, a.floor)
                .cmp(&(b.component, b.floor))
                .then(a.x.total_cmp(&b.x))
                .then(a.y.total_cmp(&b.y))
                .then(a.length.total_cmp(&b.length))
                .then(a.width.total_cmp(&b.width))
        });
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_placement(floor: FloorIndex, x: f64, y: f64) -> Placement {
        Placement::new(floor, x, y, 2.0, 3.0)
    }

    #[test]
    fn push_appends_in_order() {
        let mut store = PlacementStore::new();
        assert_eq!(store.push(4, make_placement(1, 0.0, 0.0)), 0);
        assert_eq!(store.push(4, make_placement(1, 5.0, 0.0)), 1);
        assert_eq!(store.count_of(4), 2);
        assert_eq!(store.get(4, 1).map(|p| p.x), Some(5.0));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_matching_uses_exact_tuple() {
        let mut store = PlacementStore::new();
        store.push(1, make_placement(1, 0.0, 0.0));
        store.push(1, make_placement(2, 0.0, 0.0));
        assert!(store.remove_matching(1, 1, 0.5, 0.0).is_none());
        let removed = store.remove_matching(1, 2, 0.0, 0.0).unwrap();
        assert_eq!(removed.floor, 2);
        assert_eq!(store.count_of(1), 1);
        assert_eq!(store.get(1, 0).unwrap().floor, 1);
    }

    #[test]
    fn removing_last_placement_drops_component() {
        let mut store = PlacementStore::new();
        store.push(9, make_placement(1, 0.0, 0.0));
        assert!(store.remove_at(9, 0).is_some());
        assert!(store.is_empty());
        assert!(store.remove_at(9, 0).is_none());
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = PlacementStore::new();
        store.push(0, make_placement(1, 0.0, 0.0));
        store.push(0, make_placement(1, 4.0, 0.0));
        let old = store.replace(0, 0, make_placement(1, 10.0, 10.0)).unwrap();
        assert_eq!(old.x, 0.0);
        assert_eq!(store.get(0, 0).unwrap().x, 10.0);
        assert_eq!(store.get(0, 1).unwrap().x, 4.0);
        assert!(store.replace(0, 5, make_placement(1, 0.0, 0.0)).is_none());
    }

    #[test]
    fn on_floor_filters() {
        let mut store = PlacementStore::new();
        store.push(0, make_placement(1, 0.0, 0.0));
        store.push(1, make_placement(2, 0.0, 0.0));
        store.push(2, make_placement(1, 6.0, 0.0));
        let ids: Vec<_> = store.on_floor(1).map(|(c, i, _)| (c, i)).collect();
        assert_eq!(ids, vec![(0, 0), (2, 0)]);
        assert_eq!(store.floors(), vec![1, 2]);
    }

    #[test]
    fn max_per_floor_counts_multi_floor_units() {
        let mut store = PlacementStore::new();
        for floor in 1..=3 {
            store.push(0, make_placement(floor, 0.0, 0.0));
        }
        store.push(0, make_placement(1, 5.0, 0.0));
        assert_eq!(store.count_of(0), 4);
        assert_eq!(store.max_per_floor(0), 2);
        assert_eq!(store.max_per_floor(7), 0);
    }

    #[test]
    fn snapshot_roundtrip_through_json() {
        let mut store = PlacementStore::new();
        store.push(0, make_placement(1, 0.0, 0.0));
        store.push(3, make_placement(2, 1.5, 2.5));
        store.push(3, Placement::new(1, 4.0, 0.0, 6.0, 20.0 / 6.0));
        store.push(5, Placement::new(2, 0.1, 0.2, 6.18, 20.0 / 6.18));
        let json = serde_json::to_string(&store.snapshot()).unwrap();
        let snapshot: LayoutSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(PlacementStore::from_snapshot(&snapshot), store);
    }

    #[test]
    fn resized_dimensions_survive_json_exactly() {
        let mut store = PlacementStore::new();
        for i in 0..2000 {
            let length = 20.0 / (0.37 * i as f64 + 1.0);
            let width = 20.0 / length;
            store.push(i % 7, Placement::new(1 + (i as u32 % 3), 0.0, 0.0, length, width));
        }
        let json = serde_json::to_string(&store.snapshot()).unwrap();
        let snapshot: LayoutSnapshot = serde_json::from_str(&json).unwrap();
        let restored = PlacementStore::from_snapshot(&snapshot);
        for (component, index, placement) in store.iter() {
            let back = restored.get(component, index).unwrap();
            assert_eq!(back.length.to_bits(), placement.length.to_bits());
            assert_eq!(back.width.to_bits(), placement.width.to_bits());
        }
        assert_eq!(restored, store);
    }
}
