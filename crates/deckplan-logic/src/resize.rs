//! Area-preserving edge resize.
//!
//! Dragging one edge of a placement scales it without changing its area:
//! whatever the dragged dimension gains, the other dimension gives back.
//! Every component stands for a fixed physical footprint, so free-form
//! resizing is not offered.
//!
//! Both dimensions are held to at least [`MIN_DIMENSION`]. That caps the
//! dragged dimension at `area / MIN_DIMENSION` as well.

use serde::{Deserialize, Serialize};

use crate::constants::{AREA_EPSILON, MIN_DIMENSION};
use crate::error::EditError;
use crate::floor::FloorDimensions;
use crate::overlap::Rect;

/// Which edge of the rectangle is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Whether the edge moves along the length (x) axis.
    pub fn is_horizontal_drag(&self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }
}

/// One axis of a rectangle seen generically: origin and extent along the
/// dragged axis, origin and extent along the other one, and the floor limits.
#[derive(Debug, Clone, Copy)]
struct Axes {
    origin: f64,
    extent: f64,
    cross_origin: f64,
    cross_extent: f64,
    limit: f64,
    cross_limit: f64,
}

/// Compute the rectangle after dragging `edge` by `delta` meters.
///
/// `original` is the rectangle when the drag started and `area` the area
/// captured at that moment. The result always satisfies
/// `length * width == area` to floating-point precision.
pub fn resize(
    edge: Edge,
    delta: f64,
    original: &Rect,
    area: f64,
    dims: &FloorDimensions,
) -> Result<Rect, EditError> {
    if !(area > 0.0 && area.is_finite()) {
        return Err(EditError::DegenerateInput("area must be positive"));
    }
    if !(original.length > 0.0 && original.width > 0.0) {
        return Err(EditError::DegenerateInput("rectangle must have positive size"));
    }
    if !(dims.length > 0.0 && dims.width > 0.0) {
        return Err(EditError::DegenerateInput("floor must have positive size"));
    }
    if !delta.is_finite() {
        return Err(EditError::DegenerateInput("drag delta must be finite"));
    }

    let resized = if edge.is_horizontal_drag() {
        let axes = Axes {
            origin: original.x,
            extent: original.length,
            cross_origin: original.y,
            cross_extent: original.width,
            limit: dims.length,
            cross_limit: dims.width,
        };
        let (x, length, width) = match edge {
            Edge::Right => drag_far_edge(&axes, delta, area),
            _ => drag_near_edge(&axes, delta, area),
        };
        Rect::new(x, original.y, length, width)
    } else {
        let axes = Axes {
            origin: original.y,
            extent: original.width,
            cross_origin: original.x,
            cross_extent: original.length,
            limit: dims.width,
            cross_limit: dims.length,
        };
        let (y, width, length) = match edge {
            Edge::Bottom => drag_far_edge(&axes, delta, area),
            _ => drag_near_edge(&axes, delta, area),
        };
        Rect::new(original.x, y, length, width)
    };

    let clamped = final_clamp(resized, area, dims);
    if !clamped.fits_within(dims)
        || clamped.length < MIN_DIMENSION - AREA_EPSILON
        || clamped.width < MIN_DIMENSION - AREA_EPSILON
    {
        return Err(EditError::OutOfBounds);
    }
    Ok(clamped)
}

/// Drag the right (or bottom) edge. The origin stays put.
/// Returns `(origin, extent, cross_extent)`.
fn drag_far_edge(axes: &Axes, delta: f64, area: f64) -> (f64, f64, f64) {
    let max_extent = (axes.limit - axes.origin).min(area / MIN_DIMENSION);
    let mut extent = clamp_range(axes.extent + delta, MIN_DIMENSION, max_extent);
    let mut cross = area / extent;
    if axes.cross_origin + cross > axes.cross_limit {
        cross = axes.cross_limit - axes.cross_origin;
        extent = area / cross;
    }
    (axes.origin, extent, cross)
}

/// Drag the left (or top) edge. The opposite edge stays put and the origin
/// follows the pointer. Returns `(origin, extent, cross_extent)`.
fn drag_near_edge(axes: &Axes, delta: f64, area: f64) -> (f64, f64, f64) {
    let far = axes.origin + axes.extent;
    let lowest = 0.0_f64.max(far - area / MIN_DIMENSION);
    let mut origin = clamp_range(axes.origin + delta, lowest, far - MIN_DIMENSION);
    let mut extent = far - origin;
    let mut cross = area / extent;
    if axes.cross_origin + cross > axes.cross_limit {
        cross = axes.cross_limit - axes.cross_origin;
        extent = area / cross;
        origin = far - extent;
    }
    (origin, extent, cross)
}

/// Pull both dimensions back into the floor, re-deriving the partner
/// dimension from `area` each time.
fn final_clamp(mut rect: Rect, area: f64, dims: &FloorDimensions) -> Rect {
    if rect.right() > dims.length {
        rect.length = dims.length - rect.x;
        rect.width = area / rect.length;
    }
    if rect.bottom() > dims.width {
        rect.width = dims.width - rect.y;
        rect.length = area / rect.width;
    }
    rect
}

/// `value.clamp(lo, hi)` that tolerates `lo > hi` by favoring `lo`.
fn clamp_range(value: f64, lo: f64, hi: f64) -> f64 {
    value.min(hi).max(lo)
}
