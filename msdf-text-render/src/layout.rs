//! Text layout: strings to screen-space glyph quads.
//!
//! Screen space is in pixels with y pointing down. The origin passed to
//! [`layout_text`] is the top-left of the first line; the baseline sits one
//! scaled ascender below it. Layout keeps no state between calls.

use glam::{DVec2, Mat4, Vec2};
use msdf_text_atlas::{AtlasGeometry, GlyphRecord};

use crate::batch::VertexBatch;

/// Size, fill color and transform for one layout call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Pixel height of a line, ascender to descender
    pub size: f32,
    pub color: [f32; 4],
    /// Applied to quad corners after they are snapped to whole pixels
    pub transform: Mat4,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            color: [1.0, 1.0, 1.0, 1.0],
            transform: Mat4::IDENTITY,
        }
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

/// Pixel extent of laid-out text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
    pub lines: usize,
}

/// Walk `text`, calling `place` with each drawable record and its pen
/// position (x, baseline y). Returns the extent of the walk.
fn walk_glyphs<'a>(
    geometry: &'a AtlasGeometry,
    origin: DVec2,
    text: &str,
    size: f64,
    mut place: impl FnMut(&'a GlyphRecord, DVec2, f64),
) -> TextExtent {
    let metrics = geometry.metrics();
    let span = metrics.ascent_descent_span();
    if text.is_empty() || span <= 0.0 || size <= 0.0 {
        return TextExtent::default();
    }
    let scale = size / span;
    let line_advance = metrics.line_height * scale;

    let mut pen = DVec2::new(origin.x, origin.y + metrics.ascender * scale);
    let mut width: f64 = 0.0;
    let mut lines = 1;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\n' {
            width = width.max(pen.x - origin.x);
            pen.x = origin.x;
            pen.y += line_advance;
            lines += 1;
            continue;
        }
        let Some(record) = geometry.lookup_or_fallback(ch) else {
            log::trace!("No glyph or fallback for {ch:?}, skipping");
            continue;
        };
        place(record, pen, scale);

        let mut advance = record.advance;
        if let Some(&next) = chars.peek() {
            advance += geometry.kerning(ch, next);
        }
        pen.x += advance * scale;
    }
    width = width.max(pen.x - origin.x);

    TextExtent {
        width: width as f32,
        height: (span * scale + (lines - 1) as f64 * line_advance) as f32,
        lines,
    }
}

/// Screen rectangle `[x0, y0, x1, y1]` of a glyph at `pen`, snapped down to
/// whole pixels
fn glyph_quad(record: &GlyphRecord, pen: DVec2, scale: f64) -> [f32; 4] {
    let plane = &record.plane_bounds;
    [
        (pen.x + plane.left * scale).floor() as f32,
        (pen.y - plane.top * scale).floor() as f32,
        (pen.x + plane.right * scale).floor() as f32,
        (pen.y - plane.bottom * scale).floor() as f32,
    ]
}

/// Lay out `text` starting at `origin` and append two triangles per visible
/// glyph to `batch`. Characters missing from the atlas use the fallback
/// glyph, or are skipped when there is none. `'\n'` starts a new line.
///
/// Returns the number of vertices appended.
pub fn layout_text(
    geometry: &AtlasGeometry,
    origin: Vec2,
    text: &str,
    style: &TextStyle,
    batch: &mut VertexBatch,
) -> usize {
    let before = batch.len();
    walk_glyphs(
        geometry,
        origin.as_dvec2(),
        text,
        f64::from(style.size),
        |record, pen, scale| {
            if record.is_whitespace() {
                return;
            }
            let quad = glyph_quad(record, pen, scale);
            batch.push_quad(quad, geometry.uv_rect(record), style.color, &style.transform);
        },
    );
    batch.len() - before
}

/// Extent `text` would occupy at pixel `size`, using the same advance,
/// kerning and line rules as [`layout_text`].
pub fn measure_text(geometry: &AtlasGeometry, text: &str, size: f32) -> TextExtent {
    walk_glyphs(geometry, DVec2::ZERO, text, f64::from(size), |_, _, _| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use msdf_text_atlas::PlaneBounds;

    fn record(left: f64, right: f64) -> GlyphRecord {
        GlyphRecord {
            character: 'x',
            advance: 0.5,
            plane_bounds: PlaneBounds {
                left,
                bottom: -0.1,
                right,
                top: 0.7,
            },
            atlas_bounds: Default::default(),
            edge_colors: Vec::new(),
        }
    }

    #[test]
    fn test_glyph_quad_floors_corners() {
        let quad = glyph_quad(&record(0.05, 0.45), DVec2::new(10.3, 19.2), 24.0);
        // 10.3 + 1.2 = 11.5, 19.2 - 16.8 = 2.4, 10.3 + 10.8 = 21.1, 19.2 + 2.4 = 21.6
        assert_eq!(quad, [11.0, 2.0, 21.0, 21.0]);
    }

    #[test]
    fn test_text_style_builders() {
        let style = TextStyle::new(16.0).with_color([1.0, 0.0, 0.0, 1.0]);
        assert_eq!(style.size, 16.0);
        assert_eq!(style.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(style.transform, Mat4::IDENTITY);
    }
}
