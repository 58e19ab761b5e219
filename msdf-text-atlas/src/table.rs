//! The atlas geometry table: per-glyph placement and metrics consumed by
//! text layout.
//!
//! The table is immutable once built. It is shared behind an `Arc` and read
//! concurrently by any number of layout calls.

use std::collections::HashMap;

use msdf_text_config::PixelFormat;
use msdf_text_fonts::FontMetrics;
use serde::{Deserialize, Serialize};

use crate::color::EdgeColor;
use crate::glyph::PlaneBounds;

/// Glyph rectangle in atlas pixels, y down. Edges sit on the centers of the
/// outermost texels of the glyph box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl AtlasBounds {
    /// Whether the glyph occupies no atlas area (whitespace)
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Everything known about one rasterized character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRecord {
    pub character: char,
    /// Horizontal advance in em units
    pub advance: f64,
    /// Quad bounds relative to the pen position, em units, y up
    pub plane_bounds: PlaneBounds,
    pub atlas_bounds: AtlasBounds,
    /// Final edge colors, contour by contour
    #[serde(skip)]
    pub edge_colors: Vec<EdgeColor>,
}

impl GlyphRecord {
    pub fn is_whitespace(&self) -> bool {
        self.atlas_bounds.is_empty()
    }
}

/// Lookup table from character to [`GlyphRecord`], plus font metrics,
/// kerning and the parameters the atlas was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasGeometry {
    pub(crate) name: String,
    pub(crate) glyphs: HashMap<char, GlyphRecord>,
    pub(crate) kerning: HashMap<(char, char), f64>,
    pub(crate) metrics: FontMetrics,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) em_size: f64,
    pub(crate) pixel_range: f64,
    pub(crate) pixel_format: PixelFormat,
    pub(crate) fallback_char: char,
}

impl AtlasGeometry {
    pub fn lookup(&self, character: char) -> Option<&GlyphRecord> {
        self.glyphs.get(&character)
    }

    /// Look up `character`, substituting the fallback glyph on a miss.
    /// Returns `None` only when the fallback glyph is absent too.
    pub fn lookup_or_fallback(&self, character: char) -> Option<&GlyphRecord> {
        self.glyphs
            .get(&character)
            .or_else(|| self.glyphs.get(&self.fallback_char))
    }

    /// Advance adjustment in em units for `left` followed by `right`
    pub fn kerning(&self, left: char, right: char) -> f64 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0.0)
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Atlas `(width, height)` in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixels per em the atlas was rasterized at, after any scale relaxation
    pub fn em_size(&self) -> f64 {
        self.em_size
    }

    /// Distance-field range in atlas pixels
    pub fn pixel_range(&self) -> f64 {
        self.pixel_range
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn fallback_char(&self) -> char {
        self.fallback_char
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Records sorted by character
    pub fn records(&self) -> Vec<&GlyphRecord> {
        let mut records: Vec<&GlyphRecord> = self.glyphs.values().collect();
        records.sort_by_key(|r| r.character);
        records
    }

    /// Non-zero kerning pairs sorted by `(left, right)`
    pub fn kerning_pairs(&self) -> Vec<((char, char), f64)> {
        let mut pairs: Vec<((char, char), f64)> =
            self.kerning.iter().map(|(k, v)| (*k, *v)).collect();
        pairs.sort_by_key(|(k, _)| *k);
        pairs
    }

    /// Atlas bounds of `record` divided by the atlas dimensions, as
    /// `[left, top, right, bottom]` texture coordinates
    pub fn uv_rect(&self, record: &GlyphRecord) -> [f32; 4] {
        if self.width == 0 || self.height == 0 {
            return [0.0; 4];
        }
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let b = &record.atlas_bounds;
        [
            (b.left / w) as f32,
            (b.top / h) as f32,
            (b.right / w) as f32,
            (b.bottom / h) as f32,
        ]
    }
}
