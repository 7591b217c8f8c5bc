//! Candidate footprints for a component of a given area.
//!
//! The host usually offers the user a dropdown of `length × width` pairs.
//! How those are chosen is up to the host; [`FactorPairAdvisor`] is a
//! simple default.

use serde::{Deserialize, Serialize};

use crate::constants::{AREA_EPSILON, MIN_DIMENSION};
use crate::floor::FloorDimensions;

/// A `length × width` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
}

impl Dimensions {
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// Long side over short side, always `>= 1`.
    pub fn aspect(&self) -> f64 {
        self.length.max(self.width) / self.length.min(self.width)
    }
}

pub trait DimensionAdvisor {
    /// Footprints with the given area that fit on the floor, best first.
    fn suggest(&self, area: f64, dims: &FloorDimensions) -> Vec<Dimensions>;
}

/// Whole-meter lengths whose derived width fits the floor, most square first.
#[derive(Debug, Clone)]
pub struct FactorPairAdvisor {
    /// Upper bound on how many suggestions are returned.
    pub max_options: usize,
}

impl Default for FactorPairAdvisor {
    fn default() -> Self {
        Self { max_options: 8 }
    }
}

impl DimensionAdvisor for FactorPairAdvisor {
    fn suggest(&self, area: f64, dims: &FloorDimensions) -> Vec<Dimensions> {
        if !(area > 0.0 && area.is_finite()) || !dims.is_usable() {
            return Vec::new();
        }

        let max_length = dims.length.min(area / MIN_DIMENSION).floor() as u32;
        let mut options: Vec<Dimensions> = (1..=max_length)
            .map(|length| {
                let length = length as f64;
                Dimensions {
                    length,
                    width: area / length,
                }
            })
            .filter(|d| d.width >= MIN_DIMENSION - AREA_EPSILON)
            .filter(|d| d.width <= dims.width + AREA_EPSILON)
            .collect();

        options.sort_by(|a, b| a.aspect().total_cmp(&b.aspect()));
        options.truncate(self.max_options);
        options
    }
}
