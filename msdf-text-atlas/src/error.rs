//! Typed error types for msdf-text-atlas.
//!
//! Atlas construction is all-or-nothing: any of these errors means no
//! geometry table or bitmap was produced.

use msdf_text_config::ConfigError;
use msdf_text_fonts::FontLoadError;
use thiserror::Error;

/// Errors that abort an atlas build.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The outline provider could not open or parse the font.
    #[error("Font load failed: {0}")]
    FontLoad(#[from] FontLoadError),

    /// The packer could not place a glyph and the build is configured to abort.
    #[error("Glyph {character:?} cannot be placed: {reason}")]
    UnplaceableGlyph {
        /// Character whose box could not be placed.
        character: char,
        /// Why the glyph was rejected.
        reason: String,
    },

    /// The build configuration failed validation.
    #[error("Invalid atlas configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The worker thread pool could not be created.
    #[error("Worker pool creation failed: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// The glyph set does not fit the maximum atlas dimension even at the
    /// minimum em size.
    #[error("Atlas of {width}x{height} exceeds the maximum dimension {max}")]
    AtlasTooLarge {
        /// Smallest achievable width.
        width: u32,
        /// Smallest achievable height.
        height: u32,
        /// Configured maximum side.
        max: u32,
    },
}
