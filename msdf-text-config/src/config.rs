//! The [`AtlasConfig`] struct and its persistence / validation methods.
//!
//! Covers:
//! - Field definitions with serde defaults from [`crate::defaults`]
//! - `load` / `save` (YAML file I/O with atomic write)
//! - XDG-style path helper (`config_path`)
//! - `validate` (semantic checks run before an atlas build)

use crate::error::ConfigError;
use crate::types::{
    CharsetRange, ColoringStrategy, DimensionsConstraint, PixelFormat, UnplacedGlyphPolicy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Build-time parameters for one font atlas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Unicode ranges to rasterize (may overlap)
    #[serde(default = "crate::defaults::charset")]
    pub charset: Vec<CharsetRange>,

    /// Build scale in atlas pixels per em
    #[serde(default = "crate::defaults::em_size")]
    pub em_size: f64,

    /// Lower bound for the em size when the packer relaxes scale to fit `max_dimension`
    #[serde(default = "crate::defaults::min_em_size")]
    pub min_em_size: f64,

    /// Distance in atlas pixels that maps to the full channel value range
    #[serde(default = "crate::defaults::pixel_range")]
    pub pixel_range: f64,

    /// Empty pixels kept on every side of each glyph box
    #[serde(default = "crate::defaults::padding")]
    pub padding: u32,

    /// Miter limit used to grow glyph boxes around sharp corners (0 disables)
    #[serde(default = "crate::defaults::miter_limit")]
    pub miter_limit: f64,

    /// Edge-coloring strategy
    #[serde(default = "crate::defaults::coloring")]
    pub coloring: ColoringStrategy,

    /// Maximum corner angle in radians below which adjacent edges count as smooth
    #[serde(default = "crate::defaults::angle_threshold")]
    pub angle_threshold: f64,

    /// Seed for the seeded coloring strategies
    #[serde(default = "crate::defaults::coloring_seed")]
    pub coloring_seed: u64,

    /// Fixed number of worker threads for coloring and rasterization
    #[serde(default = "crate::defaults::worker_count")]
    pub worker_count: usize,

    /// Resolve overlapping contours when computing distances
    #[serde(default = "crate::defaults::overlap_support")]
    pub overlap_support: bool,

    /// Distance-field encoding of the atlas bitmap
    #[serde(default = "crate::defaults::pixel_format")]
    pub pixel_format: PixelFormat,

    /// Constraint on the atlas width/height
    #[serde(default = "crate::defaults::dimensions")]
    pub dimensions: DimensionsConstraint,

    /// Largest allowed atlas side in pixels
    #[serde(default = "crate::defaults::max_dimension")]
    pub max_dimension: u32,

    /// Policy for glyphs the packer cannot place
    #[serde(default = "crate::defaults::unplaced_glyphs")]
    pub unplaced_glyphs: UnplacedGlyphPolicy,

    /// Glyph substituted by layout for characters missing from the atlas.
    /// It is always added to the charset.
    #[serde(default = "crate::defaults::fallback_char")]
    pub fallback_char: char,

    /// Load kerning pairs from the font
    #[serde(default = "crate::defaults::kerning")]
    pub kerning: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            charset: crate::defaults::charset(),
            em_size: crate::defaults::em_size(),
            min_em_size: crate::defaults::min_em_size(),
            pixel_range: crate::defaults::pixel_range(),
            padding: crate::defaults::padding(),
            miter_limit: crate::defaults::miter_limit(),
            coloring: crate::defaults::coloring(),
            angle_threshold: crate::defaults::angle_threshold(),
            coloring_seed: crate::defaults::coloring_seed(),
            worker_count: crate::defaults::worker_count(),
            overlap_support: crate::defaults::overlap_support(),
            pixel_format: crate::defaults::pixel_format(),
            dimensions: crate::defaults::dimensions(),
            max_dimension: crate::defaults::max_dimension(),
            unplaced_glyphs: crate::defaults::unplaced_glyphs(),
            fallback_char: crate::defaults::fallback_char(),
            kerning: crate::defaults::kerning(),
        }
    }
}

impl AtlasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the charset ranges
    pub fn with_charset(mut self, ranges: impl Into<Vec<CharsetRange>>) -> Self {
        self.charset = ranges.into();
        self
    }

    /// Set the build scale (pixels per em)
    pub fn with_em_size(mut self, em_size: f64) -> Self {
        self.em_size = em_size;
        self
    }

    /// Set the signed-distance pixel range
    pub fn with_pixel_range(mut self, pixel_range: f64) -> Self {
        self.pixel_range = pixel_range;
        self
    }

    /// Set the per-side glyph padding
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the coloring strategy
    pub fn with_coloring(mut self, coloring: ColoringStrategy) -> Self {
        self.coloring = coloring;
        self
    }

    /// Set the coloring seed
    pub fn with_coloring_seed(mut self, seed: u64) -> Self {
        self.coloring_seed = seed;
        self
    }

    /// Set the worker thread count
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the pixel format
    pub fn with_pixel_format(mut self, pixel_format: PixelFormat) -> Self {
        self.pixel_format = pixel_format;
        self
    }

    /// Set the dimensions constraint
    pub fn with_dimensions(mut self, dimensions: DimensionsConstraint) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the maximum atlas side
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Set the unplaced-glyph policy
    pub fn with_unplaced_glyphs(mut self, policy: UnplacedGlyphPolicy) -> Self {
        self.unplaced_glyphs = policy;
        self
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading atlas config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        let config: AtlasConfig = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path` if it exists, otherwise return defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("Config file {:?} not found, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a YAML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Get the default configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        if let Some(home_dir) = dirs::home_dir() {
            home_dir
                .join(".config")
                .join("msdf-text")
                .join("atlas.yaml")
        } else {
            // Fallback if home directory cannot be determined
            PathBuf::from("atlas.yaml")
        }
    }

    /// Total number of code points named by the charset ranges, before
    /// deduplication of overlapping ranges.
    pub fn charset_len(&self) -> usize {
        self.charset.iter().map(CharsetRange::len).sum()
    }

    /// Check semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.em_size.is_finite() && self.em_size > 0.0) {
            return Err(ConfigError::Validation(format!(
                "em_size must be a positive number, got {}",
                self.em_size
            )));
        }
        if !(self.min_em_size.is_finite() && self.min_em_size > 0.0) {
            return Err(ConfigError::Validation(format!(
                "min_em_size must be a positive number, got {}",
                self.min_em_size
            )));
        }
        if !(self.pixel_range.is_finite() && self.pixel_range > 0.0) {
            return Err(ConfigError::Validation(format!(
                "pixel_range must be a positive number, got {}",
                self.pixel_range
            )));
        }
        if !(self.miter_limit.is_finite() && self.miter_limit >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "miter_limit must be zero or positive, got {}",
                self.miter_limit
            )));
        }
        if !(self.angle_threshold.is_finite() && self.angle_threshold > 0.0) {
            return Err(ConfigError::Validation(format!(
                "angle_threshold must be a positive angle in radians, got {}",
                self.angle_threshold
            )));
        }
        if self.worker_count == 0 {
            return Err(ConfigError::Validation(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if self.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "max_dimension must be at least 1".to_string(),
            ));
        }
        if self.padding > self.max_dimension / 2 {
            return Err(ConfigError::Validation(format!(
                "padding {} leaves no room inside max_dimension {}",
                self.padding, self.max_dimension
            )));
        }
        if let Some(range) = self.charset.iter().find(|r| r.end > char::MAX as u32) {
            return Err(ConfigError::Validation(format!(
                "charset range U+{:04X}-U+{:04X} ends past U+10FFFF",
                range.start, range.end
            )));
        }
        if let Some(range) = self.charset.iter().find(|r| r.end < r.start) {
            return Err(ConfigError::Validation(format!(
                "charset range U+{:04X}-U+{:04X} is inverted",
                range.start, range.end
            )));
        }
        Ok(())
    }
}
