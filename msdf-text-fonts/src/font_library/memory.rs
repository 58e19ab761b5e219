//! In-memory outline source.

use std::collections::{HashMap, HashSet};

use crate::metrics::FontMetrics;
use crate::outline::GlyphOutline;
use crate::source::OutlineSource;

/// A font assembled from explicit outlines, metrics and kerning pairs.
///
/// Used wherever a real font file is unavailable or unwanted: tests, and
/// tooling that renders programmatic shapes.
#[derive(Debug, Clone, Default)]
pub struct MemoryFont {
    name: String,
    metrics: FontMetrics,
    glyphs: HashMap<char, GlyphOutline>,
    kerning: HashMap<(char, char), f64>,
}

impl MemoryFont {
    pub fn new(name: impl Into<String>, metrics: FontMetrics) -> Self {
        Self {
            name: name.into(),
            metrics,
            glyphs: HashMap::new(),
            kerning: HashMap::new(),
        }
    }

    /// Add or replace the outline for `character`
    pub fn with_glyph(mut self, character: char, outline: GlyphOutline) -> Self {
        self.glyphs.insert(character, outline);
        self
    }

    /// Add a kerning adjustment for the pair `left` then `right`
    pub fn with_kerning(mut self, left: char, right: char, adjustment: f64) -> Self {
        self.kerning.insert((left, right), adjustment);
        self
    }

    /// Build a font where every character in `characters` gets a simple
    /// block glyph. Whitespace characters get an empty outline. Shapes vary
    /// with the code point so glyphs differ in size and curvature.
    pub fn blocks(name: impl Into<String>, characters: impl IntoIterator<Item = char>) -> Self {
        let mut font = Self::new(name, FontMetrics::default());
        for ch in characters {
            font.glyphs.insert(ch, block_glyph(ch));
        }
        font
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

fn block_glyph(ch: char) -> GlyphOutline {
    let code = u32::from(ch);
    let width = 0.3 + f64::from(code % 5) * 0.05;
    let mut outline = GlyphOutline::new(width + 0.15);
    if ch.is_whitespace() {
        return outline;
    }
    let height = 0.5 + f64::from(code % 3) * 0.1;
    let (left, right) = (0.05, 0.05 + width);

    match code % 3 {
        // Plain box
        0 => {
            outline.add_rect(left, 0.0, right, height);
        }
        // Box with a quadratic arch on top
        1 => {
            outline
                .move_to(left, 0.0)
                .line_to(left, height)
                .quad_to((left + right) * 0.5, height + 0.15, right, height)
                .line_to(right, 0.0)
                .close();
        }
        // Box with a rectangular counter wound the opposite way
        _ => {
            outline.add_rect(left, 0.0, right, height);
            let inset = width * 0.3;
            outline
                .move_to(left + inset, inset)
                .line_to(right - inset, inset)
                .line_to(right - inset, height - inset)
                .line_to(left + inset, height - inset)
                .close();
        }
    }
    outline
}

impl OutlineSource for MemoryFont {
    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn outline(&self, character: char) -> Option<GlyphOutline> {
        self.glyphs.get(&character).cloned()
    }

    fn kerning(&self, left: char, right: char) -> f64 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0.0)
    }

    fn kerning_pairs(&self, chars: &[char]) -> Vec<((char, char), f64)> {
        let wanted: HashSet<char> = chars.iter().copied().collect();
        self.kerning
            .iter()
            .filter(|((left, right), adjustment)| {
                wanted.contains(left) && wanted.contains(right) && **adjustment != 0.0 && adjustment.is_finite()
            })
            .map(|(&pair, &adjustment)| (pair, adjustment))
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
