//! Glyph outlines as drawing commands.

use glam::DVec2;

/// One path command of a glyph outline, in em units with y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    /// Start a new contour
    MoveTo(DVec2),
    /// Straight segment to the point
    LineTo(DVec2),
    /// Quadratic Bézier with one control point
    QuadTo(DVec2, DVec2),
    /// Cubic Bézier with two control points
    CurveTo(DVec2, DVec2, DVec2),
    /// Close the current contour back to its start
    Close,
}

/// Vector outline of a single glyph plus its horizontal advance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphOutline {
    /// Horizontal pen advance in em units
    pub advance: f64,
    /// Path commands; empty for blank glyphs such as the space
    pub commands: Vec<OutlineCommand>,
}

impl GlyphOutline {
    pub fn new(advance: f64) -> Self {
        Self {
            advance,
            commands: Vec::new(),
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(OutlineCommand::MoveTo(DVec2::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(OutlineCommand::LineTo(DVec2::new(x, y)));
        self
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> &mut Self {
        self.commands.push(OutlineCommand::QuadTo(
            DVec2::new(cx, cy),
            DVec2::new(x, y),
        ));
        self
    }

    pub fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> &mut Self {
        self.commands.push(OutlineCommand::CurveTo(
            DVec2::new(c1x, c1y),
            DVec2::new(c2x, c2y),
            DVec2::new(x, y),
        ));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(OutlineCommand::Close);
        self
    }

    /// Closed axis-aligned rectangle contour, wound clockwise like a
    /// TrueType outer contour.
    pub fn add_rect(&mut self, left: f64, bottom: f64, right: f64, top: f64) -> &mut Self {
        self.move_to(left, bottom)
            .line_to(left, top)
            .line_to(right, top)
            .line_to(right, bottom)
            .close()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of contours (one per `MoveTo`)
    pub fn contour_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, OutlineCommand::MoveTo(_)))
            .count()
    }

    /// Bounding box of every point including control points, as `(min, max)`.
    /// Returns `None` for an empty outline.
    pub fn control_bounds(&self) -> Option<(DVec2, DVec2)> {
        let mut bounds: Option<(DVec2, DVec2)> = None;
        let mut include = |p: DVec2| {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(p), max.max(p)),
                None => (p, p),
            });
        };
        for command in &self.commands {
            match *command {
                OutlineCommand::MoveTo(p) | OutlineCommand::LineTo(p) => include(p),
                OutlineCommand::QuadTo(c, p) => {
                    include(c);
                    include(p);
                }
                OutlineCommand::CurveTo(c1, c2, p) => {
                    include(c1);
                    include(c2);
                    include(p);
                }
                OutlineCommand::Close => {}
            }
        }
        bounds
    }

    /// Multiply every coordinate and the advance by `factor`
    pub fn scaled(mut self, factor: f64) -> Self {
        self.advance *= factor;
        for command in &mut self.commands {
            match command {
                OutlineCommand::MoveTo(p) | OutlineCommand::LineTo(p) => *p *= factor,
                OutlineCommand::QuadTo(c, p) => {
                    *c *= factor;
                    *p *= factor;
                }
                OutlineCommand::CurveTo(c1, c2, p) => {
                    *c1 *= factor;
                    *c2 *= factor;
                    *p *= factor;
                }
                OutlineCommand::Close => {}
            }
        }
        self
    }
}
