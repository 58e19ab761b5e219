//! Multi-channel signed distance field font atlas builder.
//!
//! This crate turns glyph outlines into a packed distance-field bitmap and
//! the geometry table text layout needs:
//!
//! - Charset selection from Unicode ranges
//! - Edge coloring (seeded simple / ink trap, deterministic by distance)
//! - Shelf packing with scale relaxation and explicit unplaced-glyph policy
//! - Parallel SDF / MSDF / MTSDF rasterization with overlap support
//! - The immutable [`AtlasGeometry`] lookup table and a JSON layout export

pub mod bitmap;
pub mod builder;
pub mod charset;
pub mod color;
pub mod coloring;
pub mod edge;
pub mod equation;
pub mod error;
pub mod export;
pub mod generator;
pub mod glyph;
pub mod packer;
pub mod shape;
pub mod table;

// Re-export main public types
pub use bitmap::AtlasBitmap;
pub use builder::{AtlasBuilder, BuildReport, FontAtlas};
pub use charset::Charset;
pub use color::EdgeColor;
pub use error::AtlasError;
pub use export::AtlasLayout;
pub use glyph::PlaneBounds;
pub use packer::{PackResult, Placement};
pub use table::{AtlasBounds, AtlasGeometry, GlyphRecord};

// Re-export shared types from dependencies for convenience
pub use msdf_text_config::{AtlasConfig, PixelFormat};
pub use msdf_text_fonts::{FontMetrics, OutlineSource};
