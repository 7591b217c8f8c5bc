//! Shared numeric constants for the layout engine.

/// Smallest allowed length or width of any placement, in meters.
pub const MIN_DIMENSION: f64 = 1.0;

/// Grid snap step in meters. Positions are rounded to multiples of this.
pub const GRID_STEP: f64 = 1.0;

/// Tolerance for area and bound comparisons after floating-point math.
pub const AREA_EPSILON: f64 = 1e-6;

/// Default hull packing density in tons per cubic meter.
pub const DEFAULT_PACKING_DENSITY: f64 = 0.25;

/// Default ceiling height in meters.
pub const DEFAULT_CEILING_HEIGHT: f64 = 3.0;

/// Default floor aspect ratio (length / width) when no length is configured.
pub const DEFAULT_FLOOR_ASPECT: f64 = 2.0;

/// Snap a coordinate to the grid, then clamp it into `[0, max]`.
///
/// Never rounds past `max`: if rounding up would leave the range the value
/// falls back to the largest grid line that still fits.
pub fn snap_within(value: f64, max: f64) -> f64 {
    let max = max.max(0.0);
    let snapped = (value.clamp(0.0, max) / GRID_STEP).round() * GRID_STEP;
    if snapped > max + AREA_EPSILON {
        (max / GRID_STEP).floor() * GRID_STEP
    } else {
        snapped.max(0.0)
    }
}
