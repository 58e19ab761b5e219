//! Configuration system for msdf-text font atlases.
//!
//! This crate provides the build-time parameters of one atlas:
//!
//! - Unicode charset ranges to rasterize
//! - Em scale, padding and signed-distance pixel range
//! - Edge-coloring strategy, its angle threshold and seed
//! - Worker count, pixel format and atlas dimension constraints
//! - YAML loading/saving and validation
//!
//! All values are fixed for the lifetime of one atlas.

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::AtlasConfig;
pub use error::ConfigError;
pub use types::{
    CharsetRange, ColoringStrategy, DimensionsConstraint, LogLevel, PixelFormat,
    UnplacedGlyphPolicy,
};
