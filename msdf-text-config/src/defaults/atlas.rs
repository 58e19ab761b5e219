//! Default values for glyph geometry, packing and rasterization.

use crate::types::{CharsetRange, DimensionsConstraint, PixelFormat, UnplacedGlyphPolicy};

pub fn charset() -> Vec<CharsetRange> {
    vec![CharsetRange::latin1()] // Basic Latin + Latin Supplement
}

pub fn em_size() -> f64 {
    32.0 // Atlas pixels per em
}

pub fn min_em_size() -> f64 {
    4.0 // Scale relaxation stops here
}

pub fn pixel_range() -> f64 {
    2.0 // Shaders must use the same value
}

pub fn padding() -> u32 {
    1
}

pub fn miter_limit() -> f64 {
    1.0
}

pub fn overlap_support() -> bool {
    true
}

pub fn worker_count() -> usize {
    8
}

pub fn pixel_format() -> PixelFormat {
    PixelFormat::Msdf
}

pub fn dimensions() -> DimensionsConstraint {
    DimensionsConstraint::Tight
}

pub fn max_dimension() -> u32 {
    4096
}

pub fn unplaced_glyphs() -> UnplacedGlyphPolicy {
    UnplacedGlyphPolicy::Abort
}

pub fn fallback_char() -> char {
    '?'
}

pub fn kerning() -> bool {
    true
}
