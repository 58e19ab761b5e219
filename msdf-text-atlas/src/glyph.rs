//! Per-glyph geometry prepared for packing and rasterization.

use glam::DVec2;
use msdf_text_fonts::GlyphOutline;
use serde::{Deserialize, Serialize};

use crate::edge::Bounds;
use crate::shape::{Shape, ShapeDiagnostics};

/// Glyph bounds in em units, y up. All zero for glyphs with no box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaneBounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl PlaneBounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Pixel box a glyph is rendered into, and the mapping from box pixels to
/// shape coordinates: `shape = pixel / scale - translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    pub width: u32,
    pub height: u32,
    /// Pixels per em
    pub scale: f64,
    /// Offset in em units
    pub translate: DVec2,
}

impl GlyphBox {
    pub const EMPTY: GlyphBox = GlyphBox {
        width: 0,
        height: 0,
        scale: 1.0,
        translate: DVec2::ZERO,
    };

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Shape-space position of the center of pixel `(x, y)`, where `y`
    /// counts rows from the top of the box.
    pub fn pixel_center(&self, x: u32, y: u32) -> DVec2 {
        let row_from_bottom = f64::from(self.height - 1 - y);
        DVec2::new(
            (f64::from(x) + 0.5) / self.scale - self.translate.x,
            (row_from_bottom + 0.5) / self.scale - self.translate.y,
        )
    }

    /// Quad bounds in em units covering the centers of the outermost pixels
    pub fn plane_bounds(&self) -> PlaneBounds {
        if self.is_empty() {
            return PlaneBounds::default();
        }
        let inv_scale = 1.0 / self.scale;
        PlaneBounds {
            left: -self.translate.x + 0.5 * inv_scale,
            bottom: -self.translate.y + 0.5 * inv_scale,
            right: -self.translate.x + (f64::from(self.width) - 0.5) * inv_scale,
            top: -self.translate.y + (f64::from(self.height) - 0.5) * inv_scale,
        }
    }
}

/// One character's normalized shape plus metrics, before packing.
#[derive(Debug, Clone)]
pub struct PreparedGlyph {
    pub character: char,
    pub advance: f64,
    pub shape: Shape,
    pub bounds: Bounds,
    pub diagnostics: ShapeDiagnostics,
    /// The outline had commands but none survived normalization
    pub degenerate: bool,
    /// The outline or advance contained NaN or infinite values
    pub malformed: bool,
}

impl PreparedGlyph {
    pub fn new(character: char, outline: &GlyphOutline) -> Self {
        let mut shape = Shape::from_outline(outline);
        let malformed = !outline.advance.is_finite() || !shape.is_finite();
        let diagnostics = shape.normalize();
        let bounds = shape.bounds();
        let degenerate =
            !malformed && !outline.is_empty() && (shape.is_empty() || !bounds.has_area());
        PreparedGlyph {
            character,
            advance: outline.advance,
            shape,
            bounds,
            diagnostics,
            degenerate,
            malformed,
        }
    }

    /// Whether the glyph has anything to rasterize
    pub fn is_blank(&self) -> bool {
        self.shape.is_empty() || !self.bounds.has_area()
    }

    /// Whether coordinates or the advance are NaN or infinite
    pub fn is_malformed(&self) -> bool {
        self.malformed || (!self.shape.is_empty() && !self.bounds.is_finite())
    }

    /// Compute the pixel box at `scale` pixels per em, with `range` em units
    /// of distance field around the outline and miters up to `miter_limit`.
    pub fn wrap_box(&self, scale: f64, range: f64, miter_limit: f64) -> GlyphBox {
        if self.is_blank() {
            return GlyphBox::EMPTY;
        }
        let mut bounds = self.bounds;
        let half = 0.5 * range;
        bounds.left -= half;
        bounds.bottom -= half;
        bounds.right += half;
        bounds.top += half;
        if miter_limit > 0.0 {
            self.shape.bound_miters(&mut bounds, half, miter_limit, 1);
        }
        let w = scale * bounds.width();
        let h = scale * bounds.height();
        let width = w.ceil() as u32 + 1;
        let height = h.ceil() as u32 + 1;
        GlyphBox {
            width,
            height,
            scale,
            translate: DVec2::new(
                -bounds.left + 0.5 * (f64::from(width) - w) / scale,
                -bounds.bottom + 0.5 * (f64::from(height) - h) / scale,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_glyph() -> PreparedGlyph {
        let mut outline = GlyphOutline::new(0.6);
        outline.add_rect(0.1, 0.0, 0.5, 0.7);
        PreparedGlyph::new('I', &outline)
    }

    #[test]
    fn test_wrap_box_covers_outline_and_range() {
        let glyph = rect_glyph();
        let bx = glyph.wrap_box(32.0, 2.0 / 32.0, 0.0);
        // 0.4em * 32 + 2px range, rounded up plus one
        assert_eq!(bx.width, 16);
        assert!(bx.height >= (0.7 * 32.0 + 2.0) as u32);
        let plane = bx.plane_bounds();
        assert!(plane.left < 0.1 && plane.right > 0.5);
        assert!(plane.bottom < 0.0 && plane.top > 0.7);
    }

    #[test]
    fn test_box_is_centered_on_glyph() {
        let glyph = rect_glyph();
        let bx = glyph.wrap_box(32.0, 2.0 / 32.0, 0.0);
        let plane = bx.plane_bounds();
        let left_margin = 0.1 - plane.left;
        let right_margin = plane.right - 0.5;
        assert!((left_margin - right_margin).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_centers_span_plane_bounds() {
        let glyph = rect_glyph();
        let bx = glyph.wrap_box(20.0, 0.1, 1.0);
        let plane = bx.plane_bounds();
        let top_left = bx.pixel_center(0, 0);
        let bottom_right = bx.pixel_center(bx.width - 1, bx.height - 1);
        assert!((top_left.x - plane.left).abs() < 1e-9);
        assert!((top_left.y - plane.top).abs() < 1e-9);
        assert!((bottom_right.x - plane.right).abs() < 1e-9);
        assert!((bottom_right.y - plane.bottom).abs() < 1e-9);
    }

    #[test]
    fn test_blank_glyph_has_empty_box() {
        let glyph = PreparedGlyph::new(' ', &GlyphOutline::new(0.25));
        assert!(glyph.is_blank());
        assert!(!glyph.degenerate);
        assert!(glyph.wrap_box(32.0, 0.1, 1.0).is_empty());
        assert_eq!(glyph.wrap_box(32.0, 0.1, 1.0).plane_bounds(), PlaneBounds::default());
    }

    #[test]
    fn test_flat_outline_is_degenerate() {
        let mut outline = GlyphOutline::new(0.5);
        outline.move_to(0.0, 0.0).line_to(1.0, 0.0).close();
        let glyph = PreparedGlyph::new('-', &outline);
        assert!(glyph.degenerate);
        assert!(glyph.is_blank());
    }

    #[test]
    fn test_nan_outline_is_malformed() {
        let mut outline = GlyphOutline::new(0.5);
        outline.add_rect(0.0, 0.0, f64::NAN, 1.0);
        let glyph = PreparedGlyph::new('x', &outline);
        assert!(glyph.is_malformed());
        assert!(!glyph.degenerate);
    }
}
