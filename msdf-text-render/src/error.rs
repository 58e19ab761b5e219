//! Typed error types for msdf-text-render.
//!
//! Layout never fails (missing glyphs degrade to the fallback glyph); these
//! errors come from the GPU boundary only.

use thiserror::Error;

/// Errors raised while moving an atlas onto the GPU.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The atlas has no pixels, so there is nothing to upload.
    #[error("Atlas bitmap is empty")]
    EmptyAtlas,

    /// The atlas is larger than the device's 2D texture limit.
    #[error("Atlas of {width}x{height} exceeds the device texture limit {max}")]
    TextureTooLarge {
        /// Atlas width in pixels.
        width: u32,
        /// Atlas height in pixels.
        height: u32,
        /// `max_texture_dimension_2d` of the device.
        max: u32,
    },

    /// The expanded RGBA byte slice has an unexpected length.
    #[error("Invalid RGBA data size: expected {expected} bytes, got {actual} bytes")]
    InvalidTextureData {
        /// Expected byte count (`width * height * 4`).
        expected: usize,
        /// Actual byte count produced.
        actual: usize,
    },
}
