//! Nearest-valid-position search.
//!
//! Algorithm: "keep, else align to a neighbor"
//! 1. A desired position that is in bounds and free is returned untouched
//! 2. Otherwise every placement on the floor becomes an obstacle
//! 3. Each obstacle contributes 8 edge-aligned candidates: flush right, left,
//!    above and below (other axis kept at the desired value), plus the
//!    4 corner combinations
//! 4. The 4 floor boundaries contribute one candidate each
//! 5. Candidates are clamped into the floor, grid-snapped and deduplicated
//! 6. Overlapping candidates are dropped
//! 7. The survivor nearest to the desired point wins
//!
//! This is a bounded heuristic, not a packing solver. Placements are sparse
//! in practice, so an edge-aligned slot is almost always close by.

use std::collections::HashSet;

use crate::constants::{snap_within, GRID_STEP};
use crate::error::EditError;
use crate::floor::{FloorDimensions, FloorIndex};
use crate::overlap::{overlaps, Exclude, Position, Rect};
use crate::store::PlacementStore;

/// Find the closest position where a `length × width` footprint fits.
pub fn find_valid_position(
    store: &PlacementStore,
    floor: FloorIndex,
    desired: Position,
    length: f64,
    width: f64,
    dims: &FloorDimensions,
    exclude: Exclude,
) -> Result<Position, EditError> {
    if !(length > 0.0 && width > 0.0 && length.is_finite() && width.is_finite()) {
        return Err(EditError::DegenerateInput("footprint must be positive and finite"));
    }
    if !(desired.x.is_finite() && desired.y.is_finite()) {
        return Err(EditError::DegenerateInput("desired position must be finite"));
    }

    let max_x = dims.length - length;
    let max_y = dims.width - width;
    if max_x < 0.0 || max_y < 0.0 {
        return Err(EditError::NoValidPosition);
    }

    let in_bounds = (0.0..=max_x).contains(&desired.x) && (0.0..=max_y).contains(&desired.y);
    if in_bounds && !overlaps(store, floor, &Rect::at(desired, length, width), exclude) {
        return Ok(desired);
    }

    let raw = generate_candidates(store, floor, desired, length, width, dims, exclude);

    let mut seen: HashSet<(i64, i64)> = HashSet::new();
    let mut best: Option<(f64, Position)> = None;
    let mut survivors = 0usize;
    for candidate in raw {
        let snapped = Position::new(
            snap_within(candidate.x, max_x),
            snap_within(candidate.y, max_y),
        );
        let key = (
            (snapped.x / GRID_STEP).round() as i64,
            (snapped.y / GRID_STEP).round() as i64,
        );
        if !seen.insert(key) {
            continue;
        }
        let rect = Rect::at(snapped, length, width);
        if !rect.fits_within(dims) || overlaps(store, floor, &rect, exclude) {
            continue;
        }
        survivors += 1;
        let distance = snapped.distance_to(desired);
        // Strict comparison keeps the earliest candidate on ties
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, snapped));
        }
    }

    log::debug!(
        "resolver: floor {} desired ({:.2},{:.2}) {}x{} -> {} unique candidates, {} valid",
        floor,
        desired.x,
        desired.y,
        length,
        width,
        seen.len(),
        survivors
    );

    best.map(|(_, p)| p).ok_or(EditError::NoValidPosition)
}

/// Unclamped candidates in generation order: obstacles first, then boundaries.
fn generate_candidates(
    store: &PlacementStore,
    floor: FloorIndex,
    desired: Position,
    length: f64,
    width: f64,
    dims: &FloorDimensions,
    exclude: Exclude,
) -> Vec<Position> {
    let mut candidates = Vec::new();

    for (_, _, obstacle) in store
        .on_floor(floor)
        .filter(|(c, i, _)| !exclude.skips(*c, *i))
    {
        let o = obstacle.rect();
        let right = o.right();
        let left = o.x - length;
        let above = o.y - width;
        let below = o.bottom();

        candidates.push(Position::new(right, desired.y));
        candidates.push(Position::new(left, desired.y));
        candidates.push(Position::new(desired.x, above));
        candidates.push(Position::new(desired.x, below));
        candidates.push(Position::new(right, below));
        candidates.push(Position::new(right, above));
        candidates.push(Position::new(left, below));
        candidates.push(Position::new(left, above));
    }

    candidates.push(Position::new(0.0, desired.y));
    candidates.push(Position::new(dims.length - length, desired.y));
    candidates.push(Position::new(desired.x, 0.0));
    candidates.push(Position::new(desired.x, dims.width - width));

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Placement;

    fn floor_10x10() -> FloorDimensions {
        FloorDimensions::new(10.0, 10.0)
    }

    /// Resolve on floor 1 with nothing excluded.
    fn resolve(
        store: &PlacementStore,
        desired: Position,
        (length, width): (f64, f64),
        dims: &FloorDimensions,
    ) -> Result<Position, EditError> {
        find_valid_position(store, 1, desired, length, width, dims, Exclude::Nothing)
    }

    #[test]
    fn free_position_is_returned_unchanged() {
        let store = PlacementStore::new();
        let desired = Position::new(2.3, 4.7);
        let pos = resolve(&store, desired, (2.0, 2.0), &floor_10x10()).unwrap();
        assert_eq!(pos, desired);
    }

    #[test]
    fn position_just_outside_the_floor_is_clamped() {
        let store = PlacementStore::new();
        let dims = floor_10x10();
        for desired in [Position::new(-5e-7, 0.0), Position::new(0.0, 8.0 + 5e-7)] {
            let pos = resolve(&store, desired, (2.0, 2.0), &dims).unwrap();
            assert!(pos.x >= 0.0 && pos.x + 2.0 <= dims.length, "{pos:?}");
            assert!(pos.y >= 0.0 && pos.y + 2.0 <= dims.width, "{pos:?}");
            assert_ne!(pos, desired);
        }
    }

    #[test]
    fn resolves_next_to_corner_obstacle() {
        let mut store = PlacementStore::new();
        store.push(0, Placement::new(1, 0.0, 0.0, 5.0, 5.0));
        let pos = find_valid_position(
            &store,
            1,
            Position::new(-0.5, -0.5),
            5.0,
            5.0,
            &floor_10x10(),
            Exclude::Nothing,
        )
        .unwrap();
        assert!(
            pos == Position::new(5.0, 0.0) || pos == Position::new(0.0, 5.0),
            "unexpected {pos:?}"
        );
    }

    #[test]
    fn full_floor_has_no_position() {
        let dims = FloorDimensions::new(5.0, 5.0);
        let mut store = PlacementStore::new();
        store.push(0, Placement::new(1, 0.0, 0.0, 5.0, 5.0));
        for (x, y) in [(0.0, 0.0), (2.0, 2.0), (4.0, 4.0), (-3.0, 7.0)] {
            let result = resolve(&store, Position::new(x, y), (1.0, 1.0), &dims);
            assert_eq!(result, Err(EditError::NoValidPosition));
        }
    }

    #[test]
    fn oversized_footprint_has_no_position() {
        let store = PlacementStore::new();
        let result = find_valid_position(
            &store,
            1,
            Position::new(0.0, 0.0),
            11.0,
            1.0,
            &floor_10x10(),
            Exclude::Nothing,
        );
        assert_eq!(result, Err(EditError::NoValidPosition));
    }

    #[test]
    fn degenerate_footprint_is_rejected() {
        let store = PlacementStore::new();
        let dims = floor_10x10();
        let zero = resolve(&store, Position::new(0.0, 0.0), (0.0, 1.0), &dims);
        assert!(matches!(zero, Err(EditError::DegenerateInput(_))));
        let nan = resolve(&store, Position::new(f64::NAN, 0.0), (1.0, 1.0), &dims);
        assert!(matches!(nan, Err(EditError::DegenerateInput(_))));
    }

    #[test]
    fn out_of_bounds_request_is_pulled_inside() {
        let store = PlacementStore::new();
        let pos = find_valid_position(
            &store,
            1,
            Position::new(8.6, 3.2),
            3.0,
            3.0,
            &floor_10x10(),
            Exclude::Nothing,
        )
        .unwrap();
        // Boundary candidate x = 10 - 3 = 7, y snapped from 3.2
        assert_eq!(pos, Position::new(7.0, 3.0));
    }

    #[test]
    fn picks_nearest_side_of_obstacle() {
        let mut store = PlacementStore::new();
        store.push(0, Placement::new(1, 3.0, 3.0, 4.0, 4.0));
        // Desired overlaps the obstacle's right half
        let pos = find_valid_position(
            &store,
            1,
            Position::new(6.0, 4.0),
            2.0,
            2.0,
            &floor_10x10(),
            Exclude::Nothing,
        )
        .unwrap();
        assert_eq!(pos, Position::new(7.0, 4.0));
    }

    #[test]
    fn excluded_component_is_not_an_obstacle() {
        let mut store = PlacementStore::new();
        store.push(0, Placement::new(1, 0.0, 0.0, 5.0, 5.0));
        let desired = Position::new(1.0, 1.0);
        let pos = find_valid_position(
            &store,
            1,
            desired,
            2.0,
            2.0,
            &floor_10x10(),
            Exclude::Component(0),
        )
        .unwrap();
        assert_eq!(pos, desired);
    }

    #[test]
    fn repeated_calls_agree() {
        let mut store = PlacementStore::new();
        store.push(0, Placement::new(1, 2.0, 2.0, 3.0, 3.0));
        store.push(1, Placement::new(1, 6.0, 1.0, 2.0, 6.0));
        let dims = floor_10x10();
        let a = resolve(&store, Position::new(3.0, 3.0), (2.0, 2.0), &dims);
        let b = resolve(&store, Position::new(3.0, 3.0), (2.0, 2.0), &dims);
        assert_eq!(a, b);
        assert!(a.is_ok());
    }
}
