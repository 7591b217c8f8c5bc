//! Floor geometry derived from ship-level parameters.
//!
//! A floor is not a stored entity. Its size is recomputed from the ship's
//! aggregate weight, ceiling height and floor count whenever the editor
//! needs it, so a configuration change shows up on the very next call.
//!
//! ```
//! use deckplan_logic::floor::{FloorGeometry, ShipParameters};
//!
//! let mut params = ShipParameters::default();
//! params.total_weight = 3000.0;
//! params.floor_length = Some(40.0);
//! let dims = params.floor_dimensions();
//! assert!((dims.length * dims.width - dims.area).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CEILING_HEIGHT, DEFAULT_FLOOR_ASPECT, DEFAULT_PACKING_DENSITY, MIN_DIMENSION,
};

/// 1-based floor number.
pub type FloorIndex = u32;

/// Usable size of one floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorDimensions {
    pub length: f64,
    pub width: f64,
    pub area: f64,
}

impl FloorDimensions {
    /// Dimensions of a floor with the given length and width.
    pub fn new(length: f64, width: f64) -> Self {
        Self {
            length,
            width,
            area: length * width,
        }
    }

    /// Whether the floor can hold anything at all.
    pub fn is_usable(&self) -> bool {
        self.length.is_finite()
            && self.width.is_finite()
            && self.length >= MIN_DIMENSION
            && self.width >= MIN_DIMENSION
    }
}

/// Source of the current floor size and count.
///
/// The editor never caches what this returns.
pub trait FloorGeometry {
    fn floor_dimensions(&self) -> FloorDimensions;
    fn floor_count(&self) -> u32;

    /// Whether `floor` names an existing floor.
    fn has_floor(&self, floor: FloorIndex) -> bool {
        floor >= 1 && floor <= self.floor_count()
    }
}

/// Ship-level parameters the floor size is derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipParameters {
    /// Aggregate weight of everything carried, in tons.
    pub total_weight: f64,
    /// Tons per cubic meter of hull volume.
    pub packing_density: f64,
    /// Floor-to-ceiling height in meters.
    pub ceiling_height: f64,
    /// Number of floors the hull volume is split across.
    pub floor_count: u32,
    /// Floor length in meters. `None` derives it from `aspect_ratio`.
    pub floor_length: Option<f64>,
    /// Length / width ratio used when `floor_length` is not set.
    pub aspect_ratio: f64,
}

impl Default for ShipParameters {
    fn default() -> Self {
        Self {
            total_weight: 1500.0,
            packing_density: DEFAULT_PACKING_DENSITY,
            ceiling_height: DEFAULT_CEILING_HEIGHT,
            floor_count: 2,
            floor_length: None,
            aspect_ratio: DEFAULT_FLOOR_ASPECT,
        }
    }
}

impl ShipParameters {
    /// Total walkable area across all floors, in square meters.
    pub fn total_floor_area(&self) -> f64 {
        let hull_volume = self.total_weight / self.packing_density;
        hull_volume / self.ceiling_height
    }

    /// Area of a single floor.
    pub fn floor_area(&self) -> f64 {
        self.total_floor_area() / self.floor_count.max(1) as f64
    }

    /// Floor area a mass of `weight` tons claims at this packing density.
    pub fn footprint_area(&self, weight: f64) -> f64 {
        weight / self.packing_density / self.ceiling_height
    }
}

impl FloorGeometry for ShipParameters {
    fn floor_dimensions(&self) -> FloorDimensions {
        let area = self.floor_area();
        let length = match self.floor_length {
            Some(length) => length,
            None => (area * self.aspect_ratio).sqrt().min(area),
        };
        FloorDimensions {
            length,
            width: area / length,
            area,
        }
    }

    fn floor_count(&self) -> u32 {
        self.floor_count
    }
}

/// Ship parameter validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    NonPositiveWeight(f64),
    NonPositiveDensity(f64),
    NonPositiveCeiling(f64),
    NoFloors,
    /// Configured floor length is zero, negative or not finite.
    InvalidFloorLength(f64),
    /// Floor length leaves a width below the minimum dimension.
    FloorTooNarrow { length: f64, width: f64 },
}

/// Validate ship parameters, returning every problem found.
pub fn validate_parameters(params: &ShipParameters) -> Vec<ParameterError> {
    let mut errors = Vec::new();

    if params.total_weight <= 0.0 {
        errors.push(ParameterError::NonPositiveWeight(params.total_weight));
    }
    if params.packing_density <= 0.0 {
        errors.push(ParameterError::NonPositiveDensity(params.packing_density));
    }
    if params.ceiling_height <= 0.0 {
        errors.push(ParameterError::NonPositiveCeiling(params.ceiling_height));
    }
    if params.floor_count == 0 {
        errors.push(ParameterError::NoFloors);
    }
    if let Some(length) = params.floor_length {
        if length <= 0.0 || !length.is_finite() {
            errors.push(ParameterError::InvalidFloorLength(length));
        }
    }

    // Only meaningful once the inputs themselves are sane
    if errors.is_empty() {
        let dims = params.floor_dimensions();
        if !dims.is_usable() {
            errors.push(ParameterError::FloorTooNarrow {
                length: dims.length,
                width: dims.width,
            });
        }
    }

    errors
}
