//! Axis-aligned rectangles and the overlap predicate.
//!
//! Two rectangles overlap when their interiors intersect. Shared edges do
//! not count, so components may sit flush against each other.

use serde::{Deserialize, Serialize};

use crate::catalog::ComponentIndex;
use crate::constants::AREA_EPSILON;
use crate::floor::{FloorDimensions, FloorIndex};
use crate::store::PlacementStore;

/// Top-left position on a floor, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle. `x` runs along the floor length, `y` along its width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub width: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, length: f64, width: f64) -> Self {
        Self {
            x,
            y,
            length,
            width,
        }
    }

    pub fn at(position: Position, length: f64, width: f64) -> Self {
        Self::new(position.x, position.y, length, width)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.length
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.width
    }

    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// Separating-axis test. Touching edges are not an overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Whether the rectangle lies entirely inside the floor.
    pub fn fits_within(&self, dims: &FloorDimensions) -> bool {
        self.x >= -AREA_EPSILON
            && self.y >= -AREA_EPSILON
            && self.right() <= dims.length + AREA_EPSILON
            && self.bottom() <= dims.width + AREA_EPSILON
    }

    /// Whether a point falls inside the rectangle (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Same rectangle with length and width swapped, top-left kept.
    pub fn rotated(&self) -> Self {
        Self::new(self.x, self.y, self.width, self.length)
    }
}

/// Which stored placements an overlap query ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exclude {
    /// Check against everything, including other units of the same component.
    #[default]
    Nothing,
    /// Ignore every placement of one component.
    Component(ComponentIndex),
    /// Ignore exactly one placement (component, position in its list).
    Placement(ComponentIndex, usize),
}

impl Exclude {
    pub fn skips(&self, component: ComponentIndex, placement_index: usize) -> bool {
        match *self {
            Exclude::Nothing => false,
            Exclude::Component(c) => c == component,
            Exclude::Placement(c, i) => c == component && i == placement_index,
        }
    }
}

/// Whether `rect` on `floor` intersects any stored placement not excluded.
pub fn overlaps(store: &PlacementStore, floor: FloorIndex, rect: &Rect, exclude: Exclude) -> bool {
    store
        .on_floor(floor)
        .filter(|(component, i, _)| !exclude.skips(*component, *i))
        .any(|(_, _, placement)| placement.rect().overlaps(rect))
}

/// Every non-excluded placement on `floor` that `rect` intersects.
pub fn colliding(
    store: &PlacementStore,
    floor: FloorIndex,
    rect: &Rect,
    exclude: Exclude,
) -> Vec<(ComponentIndex, usize)> {
    store
        .on_floor(floor)
        .filter(|(component, i, _)| !exclude.skips(*component, *i))
        .filter(|(_, _, placement)| placement.rect().overlaps(rect))
        .map(|(component, i, _)| (component, i))
        .collect()
}

/// Bounds check plus overlap check in one call.
pub fn is_valid(
    store: &PlacementStore,
    floor: FloorIndex,
    rect: &Rect,
    dims: &FloorDimensions,
    exclude: Exclude,
) -> bool {
    rect.fits_within(dims) && !overlaps(store, floor, rect, exclude)
}
