//! Enumerations and small value types used by [`AtlasConfig`](crate::AtlasConfig).

use serde::{Deserialize, Serialize};

// ============================================================================
// Charset
// ============================================================================

/// Inclusive range of Unicode code points to include in the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharsetRange {
    /// Start of Unicode range (inclusive), e.g., 0x0020 for space
    pub start: u32,
    /// End of Unicode range (inclusive), e.g., 0x007E for tilde
    pub end: u32,
}

impl CharsetRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Range containing a single code point
    pub const fn single(code: u32) -> Self {
        Self {
            start: code,
            end: code,
        }
    }

    /// Basic Latin + Latin-1 Supplement (U+0020..=U+00FF)
    pub const fn latin1() -> Self {
        Self::new(0x0020, 0x00FF)
    }

    /// Number of code points covered by this range (0 when inverted)
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, code: u32) -> bool {
        code >= self.start && code <= self.end
    }
}

// ============================================================================
// Edge coloring
// ============================================================================

/// Edge-coloring policy used before rasterization
///
/// The seeded strategies use a linear congruential step per glyph so that
/// coloring bias does not repeat across glyphs. `ByDistance` never consults
/// the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColoringStrategy {
    /// Corner-run coloring, seeded
    Simple,
    /// Corner-run coloring with short "minor" runs colored to avoid ink traps, seeded
    #[default]
    InkTrap,
    /// Deterministic three-color ring coloring that keeps same-colored runs far apart
    ByDistance,
}

impl ColoringStrategy {
    /// Display name for CLI output
    pub fn display_name(&self) -> &'static str {
        match self {
            ColoringStrategy::Simple => "simple",
            ColoringStrategy::InkTrap => "ink trap",
            ColoringStrategy::ByDistance => "by distance",
        }
    }

    /// Whether the strategy consumes the coloring seed
    pub fn is_seeded(&self) -> bool {
        !matches!(self, ColoringStrategy::ByDistance)
    }

    /// All strategies for iteration
    pub fn all() -> &'static [ColoringStrategy] {
        &[
            ColoringStrategy::Simple,
            ColoringStrategy::InkTrap,
            ColoringStrategy::ByDistance,
        ]
    }
}

// ============================================================================
// Pixel format
// ============================================================================

/// Distance-field encoding written to the atlas bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Single-channel true signed distance
    Sdf,
    /// Three-channel multi-channel signed distance field
    #[default]
    Msdf,
    /// MSDF in RGB plus the true signed distance in alpha
    Mtsdf,
}

impl PixelFormat {
    /// Bytes per pixel in the atlas bitmap
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Sdf => 1,
            PixelFormat::Msdf => 3,
            PixelFormat::Mtsdf => 4,
        }
    }

    /// Whether the format carries per-channel (colored) distances
    pub fn is_multi_channel(&self) -> bool {
        !matches!(self, PixelFormat::Sdf)
    }
}

// ============================================================================
// Packing
// ============================================================================

/// Constraint on the final atlas width/height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DimensionsConstraint {
    /// Smallest rectangle that holds every placement
    #[default]
    Tight,
    /// Smallest square that holds every placement
    Square,
    /// Smallest power-of-two square
    PowerOfTwoSquare,
    /// Smallest rectangle whose sides are both powers of two
    PowerOfTwoRectangle,
}

/// What to do when the packer cannot place a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedGlyphPolicy {
    /// Fail the whole atlas build (no partial atlas is produced)
    #[default]
    Abort,
    /// Drop the glyph, log a warning and record it in the build report
    Drop,
}

// ============================================================================
// Logging
// ============================================================================

/// Log level for the command-line tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    #[default]
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Parse a level name (case-insensitive), as accepted by `RUST_LOG`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "off" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Convert to the `log` crate's level filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
