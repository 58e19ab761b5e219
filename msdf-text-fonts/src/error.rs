//! Typed error types for msdf-text-fonts.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening or parsing a font resource.
///
/// A font that fails to load is fatal to atlas construction for that font.
#[derive(Debug, Error)]
pub enum FontLoadError {
    /// The font file could not be read from disk.
    #[error("Failed to read font file '{path}': {source}")]
    Io {
        /// Path to the font file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a parseable TrueType/OpenType face.
    #[error("Invalid font data: {0}")]
    InvalidData(String),

    /// No installed font matches the requested family name.
    #[error("Font family '{0}' not found")]
    NotFound(String),
}
