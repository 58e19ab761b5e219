//! A loaded font face backed by owned bytes.

use std::collections::HashMap;
use std::sync::Arc;

use glam::DVec2;
use rustybuzz::ttf_parser;
use swash::FontRef;

use crate::error::FontLoadError;
use crate::metrics::FontMetrics;
use crate::outline::{GlyphOutline, OutlineCommand};
use crate::source::OutlineSource;

/// A parsed TrueType/OpenType face.
///
/// The face owns its bytes; the swash `FontRef` (metrics, character map,
/// advances) and the `ttf_parser::Face` (outlines, kern table) borrow from
/// them for the lifetime of this struct. Dropping the face releases it.
pub struct FontFace {
    /// Raw font data bytes (TTF/OTF/TTC)
    data: Arc<Vec<u8>>,
    /// Face index within the data
    index: u32,
    /// Swash font reference for metric and charmap lookups
    font_ref: FontRef<'static>,
    /// Parsed tables for outline and kerning access
    face: ttf_parser::Face<'static>,
    units_per_em: f64,
    metrics: FontMetrics,
    name: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("data_len", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl FontFace {
    /// Parse a face from raw bytes.
    ///
    /// # Arguments
    /// * `data` - Raw font data bytes (TTF/OTF/TTC format)
    /// * `index` - Face index within the data (0 for single-face fonts)
    /// * `name` - Name used in logs and exported layouts
    pub fn from_data(
        data: Vec<u8>,
        index: u32,
        name: impl Into<String>,
    ) -> Result<Self, FontLoadError> {
        let data_arc = Arc::new(data);

        // SAFETY: the bytes live in an Arc owned by this struct and are never
        // mutated. Both borrowed views are stored alongside the Arc and are
        // dropped together with it.
        let static_bytes: &'static [u8] =
            unsafe { std::mem::transmute::<&[u8], &'static [u8]>(data_arc.as_slice()) };

        let face = ttf_parser::Face::parse(static_bytes, index)
            .map_err(|e| FontLoadError::InvalidData(e.to_string()))?;
        let font_ref = FontRef::from_index(static_bytes, index as usize).ok_or_else(|| {
            FontLoadError::InvalidData(format!("face index {} is not readable", index))
        })?;

        let swash_metrics = font_ref.metrics(&[]);
        let units_per_em = f64::from(swash_metrics.units_per_em);
        if units_per_em <= 0.0 {
            return Err(FontLoadError::InvalidData(
                "font reports zero units per em".to_string(),
            ));
        }
        let metrics = FontMetrics::from_font_units(
            units_per_em,
            f64::from(swash_metrics.ascent),
            f64::from(swash_metrics.descent),
            f64::from(swash_metrics.leading),
            f64::from(swash_metrics.max_width),
            f64::from(swash_metrics.underline_offset),
            f64::from(swash_metrics.stroke_size),
        );

        let name = name.into();
        log::debug!(
            "Parsed font face '{}' (index {}, {} units/em, {} glyphs)",
            name,
            index,
            units_per_em,
            swash_metrics.glyph_count
        );

        Ok(FontFace {
            data: data_arc,
            index,
            font_ref,
            face,
            units_per_em,
            metrics,
            name,
        })
    }

    /// Raw font bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    /// Glyph id for `character`, `None` when the font maps it to `.notdef`
    pub fn glyph_id(&self, character: char) -> Option<u16> {
        match self.font_ref.charmap().map(character) {
            0 => None,
            id => Some(id),
        }
    }

    /// Whether the font has a `kern` table with horizontal pairs
    pub fn has_kerning(&self) -> bool {
        self.face
            .tables()
            .kern
            .is_some_and(|kern| kern.subtables.into_iter().any(|s| s.horizontal))
    }
}

impl OutlineSource for FontFace {
    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn outline(&self, character: char) -> Option<GlyphOutline> {
        let glyph_id = self.glyph_id(character)?;
        let scale = 1.0 / self.units_per_em;
        let advance = f64::from(self.font_ref.glyph_metrics(&[]).advance_width(glyph_id)) * scale;

        let mut outline = GlyphOutline::new(advance);
        let mut collector = OutlineCollector {
            commands: &mut outline.commands,
            scale,
        };
        // Blank glyphs have no outline; they keep their advance.
        let _ = self
            .face
            .outline_glyph(ttf_parser::GlyphId(glyph_id), &mut collector);
        Some(outline)
    }

    fn kerning(&self, left: char, right: char) -> f64 {
        let (Some(left), Some(right)) = (self.glyph_id(left), self.glyph_id(right)) else {
            return 0.0;
        };
        let Some(kern) = self.face.tables().kern else {
            return 0.0;
        };
        kern.subtables
            .into_iter()
            .filter(|subtable| subtable.horizontal && !subtable.variable)
            .find_map(|subtable| {
                subtable.glyphs_kerning(ttf_parser::GlyphId(left), ttf_parser::GlyphId(right))
            })
            .map_or(0.0, |value| f64::from(value) / self.units_per_em)
    }

    fn kerning_pairs(&self, chars: &[char]) -> Vec<((char, char), f64)> {
        let Some(kern) = self.face.tables().kern else {
            return Vec::new();
        };
        // Several characters can share one glyph
        let mut by_glyph: HashMap<u16, Vec<char>> = HashMap::new();
        for &character in chars {
            if let Some(id) = self.glyph_id(character) {
                by_glyph.entry(id).or_default().push(character);
            }
        }

        // First subtable holding a pair wins, as in `kerning`
        let mut found: HashMap<(u16, u16), i16> = HashMap::new();
        for subtable in kern.subtables.into_iter() {
            if !subtable.horizontal || subtable.variable {
                continue;
            }
            match &subtable.format {
                ttf_parser::kern::Format::Format0(table) => {
                    for pair in table.pairs {
                        let key = (pair.left().0, pair.right().0);
                        if by_glyph.contains_key(&key.0) && by_glyph.contains_key(&key.1) {
                            found.entry(key).or_insert(pair.value);
                        }
                    }
                }
                _ => {
                    // Class-based subtables have no pair list to walk
                    for &left in by_glyph.keys() {
                        for &right in by_glyph.keys() {
                            if found.contains_key(&(left, right)) {
                                continue;
                            }
                            let value = subtable
                                .glyphs_kerning(ttf_parser::GlyphId(left), ttf_parser::GlyphId(right));
                            if let Some(value) = value {
                                found.insert((left, right), value);
                            }
                        }
                    }
                }
            }
        }

        let mut pairs = Vec::new();
        for ((left, right), value) in found {
            if value == 0 {
                continue;
            }
            let adjustment = f64::from(value) / self.units_per_em;
            for &l in &by_glyph[&left] {
                for &r in &by_glyph[&right] {
                    pairs.push(((l, r), adjustment));
                }
            }
        }
        log::debug!("Read {} kerning pairs from '{}'", pairs.len(), self.name);
        pairs
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Receives outline callbacks from ttf_parser and stores em-scaled commands.
struct OutlineCollector<'a> {
    commands: &'a mut Vec<OutlineCommand>,
    scale: f64,
}

impl OutlineCollector<'_> {
    fn point(&self, x: f32, y: f32) -> DVec2 {
        DVec2::new(f64::from(x) * self.scale, f64::from(y) * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for OutlineCollector<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.commands.push(OutlineCommand::MoveTo(p));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.commands.push(OutlineCommand::LineTo(p));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let c = self.point(x1, y1);
        let p = self.point(x, y);
        self.commands.push(OutlineCommand::QuadTo(c, p));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.point(x1, y1);
        let c2 = self.point(x2, y2);
        let p = self.point(x, y);
        self.commands.push(OutlineCommand::CurveTo(c1, c2, p));
    }

    fn close(&mut self) {
        self.commands.push(OutlineCommand::Close);
    }
}
