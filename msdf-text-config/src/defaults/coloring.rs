//! Default values for edge coloring.

use crate::types::ColoringStrategy;

pub fn coloring() -> ColoringStrategy {
    ColoringStrategy::InkTrap
}

pub fn angle_threshold() -> f64 {
    3.0 // Radians
}

pub fn coloring_seed() -> u64 {
    0
}
