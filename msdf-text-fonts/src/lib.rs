//! Outline provider for msdf-text.
//!
//! This crate provides:
//! - Font loading from files, raw bytes or the system font database
//! - Glyph outlines as move/line/quadratic/cubic commands
//! - Font-wide metrics and pairwise kerning
//! - An in-memory font for tests and tooling
//!
//! # Architecture
//!
//! Everything downstream consumes fonts through the [`OutlineSource`] trait.
//! All geometry is em-normalized: font units are divided by units-per-em, so
//! one em is `1.0` regardless of the font's design grid.

pub mod error;
pub mod font_library;
pub mod metrics;
pub mod outline;
mod source;

// Re-export main types for convenience
pub use error::FontLoadError;
pub use font_library::{FontFace, FontLibrary, MemoryFont};
pub use metrics::FontMetrics;
pub use outline::{GlyphOutline, OutlineCommand};
pub use source::OutlineSource;
