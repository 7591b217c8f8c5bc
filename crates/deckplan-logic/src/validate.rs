//! Whole-layout validation.
//!
//! Pure checks over a placement store against the current floor size.
//! Used after configuration changes and in the headless harness to confirm
//! the editor never commits an illegal layout.

use std::collections::BTreeMap;

use crate::catalog::{Catalog, ComponentIndex};
use crate::constants::{AREA_EPSILON, MIN_DIMENSION};
use crate::floor::{FloorDimensions, FloorIndex};
use crate::store::{Placement, PlacementStore};

/// A layout validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

// ── Per placement ───────────────────────────────────────────────────────

/// Check no placement is thinner than the minimum dimension.
pub fn check_dimensions(store: &PlacementStore) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (component, i, p) in store.iter() {
        if p.length < MIN_DIMENSION - AREA_EPSILON || p.width < MIN_DIMENSION - AREA_EPSILON {
            errors.push(ValidationError {
                category: "placement_geometry",
                severity: Severity::Error,
                message: format!(
                    "Component #{} unit {} is below minimum size: {}×{}",
                    component, i, p.length, p.width
                ),
            });
        }
    }
    errors
}

/// Check every placement lies inside its floor.
pub fn check_bounds(store: &PlacementStore, dims: &FloorDimensions) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (component, i, p) in store.iter() {
        if !p.rect().fits_within(dims) {
            errors.push(ValidationError {
                category: "placement_bounds",
                severity: Severity::Error,
                message: format!(
                    "Component #{} unit {} on floor {} extends outside floor: ({:.1},{:.1})→({:.1},{:.1}) vs {:.1}×{:.1}",
                    component,
                    i,
                    p.floor,
                    p.x,
                    p.y,
                    p.rect().right(),
                    p.rect().bottom(),
                    dims.length,
                    dims.width
                ),
            });
        }
    }
    errors
}

/// Check placements reference existing floors.
pub fn check_floors(store: &PlacementStore, floor_count: u32) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for floor in store.floors() {
        if floor < 1 || floor > floor_count {
            errors.push(ValidationError {
                category: "placement_bounds",
                severity: Severity::Error,
                message: format!(
                    "Floor {} has placements but only {} floors exist",
                    floor, floor_count
                ),
            });
        }
    }
    errors
}

// ── Pairwise ────────────────────────────────────────────────────────────

/// AABB overlap test: no two placements on the same floor may overlap.
pub fn check_overlaps(store: &PlacementStore) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut by_floor: BTreeMap<FloorIndex, Vec<(ComponentIndex, usize, &Placement)>> =
        BTreeMap::new();
    for (component, i, p) in store.iter() {
        by_floor.entry(p.floor).or_default().push((component, i, p));
    }

    for (floor, placements) in &by_floor {
        for a in 0..placements.len() {
            for b in (a + 1)..placements.len() {
                let (ca, ia, pa) = placements[a];
                let (cb, ib, pb) = placements[b];
                if pa.rect().overlaps(&pb.rect()) {
                    errors.push(ValidationError {
                        category: "placement_overlap",
                        severity: Severity::Error,
                        message: format!(
                            "Component #{} unit {} and component #{} unit {} overlap on floor {}",
                            ca, ia, cb, ib, floor
                        ),
                    });
                }
            }
        }
    }
    errors
}

// ── Catalog consistency ─────────────────────────────────────────────────

/// Check placements belong to known components and quantities are respected.
pub fn check_quantities(store: &PlacementStore, catalog: &Catalog) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: Vec<ComponentIndex> = store.iter().map(|(c, _, _)| c).collect();
    seen.dedup();

    for component in seen {
        let Some(entry) = catalog.get(component) else {
            errors.push(ValidationError {
                category: "catalog",
                severity: Severity::Error,
                message: format!("Placements reference unknown component #{}", component),
            });
            continue;
        };
        let placed = if entry.spans_multiple_floors {
            store.max_per_floor(component)
        } else {
            store.count_of(component)
        };
        if placed > entry.quantity as usize {
            errors.push(ValidationError {
                category: "catalog",
                severity: Severity::Warning,
                message: format!(
                    "Component #{} ({}) has {} units placed, quantity is {}",
                    component, entry.name, placed, entry.quantity
                ),
            });
        }
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all layout validations. An empty store is always valid.
pub fn validate_layout(
    store: &PlacementStore,
    catalog: &Catalog,
    dims: &FloorDimensions,
    floor_count: u32,
) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_dimensions(store));
    all.extend(check_bounds(store, dims));
    all.extend(check_floors(store, floor_count));
    all.extend(check_overlaps(store));
    all.extend(check_quantities(store, catalog));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentRecord;

    fn make_placement(floor: FloorIndex, x: f64, y: f64, l: f64, w: f64) -> Placement {
        Placement::new(floor, x, y, l, w)
    }

    fn catalog(quantity: u32, multi: bool) -> Catalog {
        Catalog::from_records(vec![ComponentRecord {
            category: "Power".to_string(),
            name: "Battery".to_string(),
            weight: 8.0,
            cost: 100.0,
            quantity,
            spans_multiple_floors: multi,
        }])
    }

    #[test]
    fn empty_store_is_valid() {
        let dims = FloorDimensions::new(10.0, 10.0);
        let errs = validate_layout(&PlacementStore::new(), &Catalog::default(), &dims, 1);
        assert!(errs.is_empty());
    }

    #[test]
    fn adjacent_placements_are_valid() {
        let mut store = PlacementStore::new();
        store.push(0, make_placement(1, 0.0, 0.0, 5.0, 5.0));
        store.push(0, make_placement(1, 5.0, 0.0, 5.0, 5.0));
        let dims = FloorDimensions::new(10.0, 10.0);
        let errs = validate_layout(&store, &catalog(2, false), &dims, 1);
        assert!(errs.is_empty(), "Expected no errors, got: {:?}", errs);
    }

    #[test]
    fn overlap_detected() {
        let mut store = PlacementStore::new();
        store.push(0, make_placement(1, 0.0, 0.0, 5.0, 5.0));
        store.push(0, make_placement(1, 3.0, 3.0, 5.0, 5.0));
        let errs = check_overlaps(&store);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("floor 1"));
    }

    #[test]
    fn same_spot_on_different_floors_is_fine() {
        let mut store = PlacementStore::new();
        store.push(0, make_placement(1, 0.0, 0.0, 5.0, 5.0));
        store.push(0, make_placement(2, 0.0, 0.0, 5.0, 5.0));
        assert!(check_overlaps(&store).is_empty());
    }

    #[test]
    fn out_of_bounds_detected() {
        let mut store = PlacementStore::new();
        store.push(0, make_placement(1, 8.0, 0.0, 5.0, 5.0));
        let errs = check_bounds(&store, &FloorDimensions::new(10.0, 10.0));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].category, "placement_bounds");
    }

    #[test]
    fn shrunken_floor_invalidates_layout() {
        let mut store = PlacementStore::new();
        store.push(0, make_placement(2, 0.0, 0.0, 5.0, 5.0));
        let errs = check_floors(&store, 1);
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn undersized_placement_detected() {
        let mut store = PlacementStore::new();
        store.push(0, make_placement(1, 0.0, 0.0, 0.5, 5.0));
        assert_eq!(check_dimensions(&store).len(), 1);
    }

    #[test]
    fn over_quantity_is_a_warning() {
        let mut store = PlacementStore::new();
        store.push(0, make_placement(1, 0.0, 0.0, 1.0, 1.0));
        store.push(0, make_placement(1, 2.0, 0.0, 1.0, 1.0));
        let errs = check_quantities(&store, &catalog(1, false));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].severity, Severity::Warning);
    }

    #[test]
    fn multi_floor_units_counted_per_floor() {
        let mut store = PlacementStore::new();
        for floor in 1..=3 {
            store.push(0, make_placement(floor, 0.0, 0.0, 1.0, 1.0));
        }
        assert!(check_quantities(&store, &catalog(1, true)).is_empty());
    }

    #[test]
    fn unknown_component_detected() {
        let mut store = PlacementStore::new();
        store.push(5, make_placement(1, 0.0, 0.0, 1.0, 1.0));
        let errs = check_quantities(&store, &catalog(1, false));
        assert!(errs[0].message.contains("#5"));
    }
}
