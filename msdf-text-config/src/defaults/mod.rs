//! Default value functions for configuration.
//!
//! Each sub-module groups related free functions used as
//! `#[serde(default = "crate::defaults::...")]` attributes on `AtlasConfig`
//! fields. Everything is re-exported from this module.

mod atlas;
mod coloring;

// ── Geometry, packing & rasterization ─────────────────────────────────────
pub use atlas::{
    charset, dimensions, em_size, fallback_char, kerning, max_dimension, min_em_size,
    miter_limit, overlap_support, padding, pixel_format, pixel_range, unplaced_glyphs,
    worker_count,
};

// ── Edge coloring ──────────────────────────────────────────────────────────
pub use coloring::{angle_threshold, coloring, coloring_seed};
