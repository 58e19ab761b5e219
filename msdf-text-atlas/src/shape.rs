//! Contours and shapes built from glyph outlines.

use glam::DVec2;
use msdf_text_fonts::{GlyphOutline, OutlineCommand};

use crate::edge::{Bounds, EdgeSegment, SignedDistance, unit};

fn shoelace(a: DVec2, b: DVec2) -> f64 {
    (b.x - a.x) * (a.y + b.y)
}

/// A closed loop of edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub edges: Vec<EdgeSegment>,
}

impl Contour {
    /// +1 for clockwise (y up), -1 for counter-clockwise, 0 for no area
    pub fn winding(&self) -> i32 {
        let total = match self.edges.as_slice() {
            [] => return 0,
            [only] => {
                let a = only.curve.point(0.0);
                let b = only.curve.point(1.0 / 3.0);
                let c = only.curve.point(2.0 / 3.0);
                shoelace(a, b) + shoelace(b, c) + shoelace(c, a)
            }
            [first, second] => {
                let a = first.curve.point(0.0);
                let b = first.curve.point(0.5);
                let c = second.curve.point(0.0);
                let d = second.curve.point(0.5);
                shoelace(a, b) + shoelace(b, c) + shoelace(c, d) + shoelace(d, a)
            }
            edges => {
                // Curves can bulge away from their end points, so sample
                // inside each edge as well
                let mut total = 0.0;
                let mut prev = edges[edges.len() - 1].curve.point(2.0 / 3.0);
                for edge in edges {
                    for t in [0.0, 1.0 / 3.0, 2.0 / 3.0] {
                        let cur = edge.curve.point(t);
                        total += shoelace(prev, cur);
                        prev = cur;
                    }
                }
                total
            }
        };
        if total > 0.0 {
            1
        } else if total < 0.0 {
            -1
        } else {
            0
        }
    }

    /// Reverse the traversal direction
    pub fn reverse(&mut self) {
        self.edges.reverse();
        for edge in &mut self.edges {
            edge.curve = edge.curve.reversed();
        }
    }

    pub fn bound(&self, bounds: &mut Bounds) {
        for edge in &self.edges {
            edge.curve.bound(bounds);
        }
    }

    /// Extend `bounds` by the miters that a stroke of half-width `border`
    /// would produce at convex corners, capped at `miter_limit`.
    pub fn bound_miters(&self, bounds: &mut Bounds, border: f64, miter_limit: f64, polarity: i32) {
        let Some(last) = self.edges.last() else {
            return;
        };
        let mut prev_dir = last.curve.direction(1.0).normalize_or_zero();
        for edge in &self.edges {
            let dir = -edge.curve.direction(0.0).normalize_or_zero();
            if f64::from(polarity) * prev_dir.perp_dot(dir) >= 0.0 {
                let mut miter_length = miter_limit;
                let q = 0.5 * (1.0 - prev_dir.dot(dir));
                if q > 0.0 {
                    miter_length = (1.0 / q.sqrt()).min(miter_limit);
                }
                let miter = edge.curve.point(0.0)
                    + border * miter_length * (prev_dir + dir).normalize_or_zero();
                bounds.include(miter);
            }
            prev_dir = edge.curve.direction(1.0).normalize_or_zero();
        }
    }
}

/// Diagnostics collected while converting and normalizing an outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeDiagnostics {
    /// Contours dropped because they had no edges or no area
    pub degenerate_contours: usize,
    /// Whether the contour orientation was flipped
    pub reversed: bool,
}

/// A glyph as a set of contours in em units, y up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub contours: Vec<Contour>,
}

impl Shape {
    /// Convert outline commands to contours. Open contours are closed with a
    /// straight edge; zero-length straight edges are skipped.
    pub fn from_outline(outline: &GlyphOutline) -> Shape {
        let mut shape = Shape::default();
        let mut current: Option<(Contour, DVec2)> = None;
        let mut pen = DVec2::ZERO;

        fn finish(shape: &mut Shape, current: &mut Option<(Contour, DVec2)>, pen: DVec2) {
            if let Some((mut contour, start)) = current.take() {
                if pen != start {
                    contour.edges.push(EdgeSegment::linear(pen, start));
                }
                shape.contours.push(contour);
            }
        }

        for command in &outline.commands {
            match *command {
                OutlineCommand::MoveTo(p) => {
                    finish(&mut shape, &mut current, pen);
                    current = Some((Contour::default(), p));
                    pen = p;
                }
                OutlineCommand::LineTo(p) => {
                    let contour = &mut current.get_or_insert_with(|| (Contour::default(), pen)).0;
                    if p != pen {
                        contour.edges.push(EdgeSegment::linear(pen, p));
                    }
                    pen = p;
                }
                OutlineCommand::QuadTo(c, p) => {
                    let contour = &mut current.get_or_insert_with(|| (Contour::default(), pen)).0;
                    contour.edges.push(EdgeSegment::quadratic(pen, c, p));
                    pen = p;
                }
                OutlineCommand::CurveTo(c1, c2, p) => {
                    let contour = &mut current.get_or_insert_with(|| (Contour::default(), pen)).0;
                    contour.edges.push(EdgeSegment::cubic(pen, c1, c2, p));
                    pen = p;
                }
                OutlineCommand::Close => {
                    finish(&mut shape, &mut current, pen);
                    if let Some(contour) = shape.contours.last()
                        && let Some(first) = contour.edges.first()
                    {
                        pen = first.curve.start();
                    }
                }
            }
        }
        finish(&mut shape, &mut current, pen);
        shape
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.contours.iter().map(|c| c.edges.len()).sum()
    }

    /// True when every edge has finite coordinates
    pub fn is_finite(&self) -> bool {
        self.contours
            .iter()
            .flat_map(|c| &c.edges)
            .all(|e| e.curve.is_finite())
    }

    /// Drop degenerate edges and contours, split single-edge contours into
    /// thirds and fix the orientation so that points outside the glyph read
    /// as negative distance.
    pub fn normalize(&mut self) -> ShapeDiagnostics {
        let mut diagnostics = ShapeDiagnostics::default();

        for contour in &mut self.contours {
            contour.edges.retain(|e| !e.curve.is_degenerate());
        }
        let before = self.contours.len();
        self.contours.retain(|c| c.winding() != 0);
        diagnostics.degenerate_contours = before - self.contours.len();

        for contour in &mut self.contours {
            if let [only] = contour.edges.as_slice() {
                let color = only.color;
                contour.edges = only
                    .curve
                    .split_in_thirds()
                    .into_iter()
                    .map(|curve| EdgeSegment { curve, color })
                    .collect();
            }
        }

        diagnostics.reversed = self.fix_orientation();
        diagnostics
    }

    /// Reverse every contour if a point far outside the bounds reads as
    /// inside. Returns whether the shape was reversed.
    fn fix_orientation(&mut self) -> bool {
        let bounds = self.bounds();
        if !bounds.has_area() {
            return false;
        }
        let outer = DVec2::new(
            bounds.left - bounds.width() - 1.0,
            bounds.bottom - bounds.height() - 1.0,
        );
        let mut min_distance = SignedDistance::INFINITE;
        for edge in self.contours.iter().flat_map(|c| &c.edges) {
            let (distance, _) = edge.curve.signed_distance(outer);
            if distance.closer_than(&min_distance) {
                min_distance = distance;
            }
        }
        if min_distance.distance > 0.0 {
            for contour in &mut self.contours {
                contour.reverse();
            }
            true
        } else {
            false
        }
    }

    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::EMPTY;
        for contour in &self.contours {
            contour.bound(&mut bounds);
        }
        bounds
    }

    pub fn bound_miters(&self, bounds: &mut Bounds, border: f64, miter_limit: f64, polarity: i32) {
        for contour in &self.contours {
            contour.bound_miters(bounds, border, miter_limit, contour.winding() * polarity);
        }
    }

    /// Contour windings, in contour order
    pub fn windings(&self) -> Vec<i32> {
        self.contours.iter().map(Contour::winding).collect()
    }

    /// Edges meeting at a corner sharper than the threshold, as
    /// `(contour, edge)` index pairs where `edge` follows the corner.
    pub fn corners(&self, angle_threshold: f64) -> Vec<(usize, usize)> {
        let cross_threshold = angle_threshold.sin();
        let mut corners = Vec::new();
        for (ci, contour) in self.contours.iter().enumerate() {
            let Some(last) = contour.edges.last() else {
                continue;
            };
            let mut prev_direction = last.curve.direction(1.0);
            for (ei, edge) in contour.edges.iter().enumerate() {
                if is_corner(unit(prev_direction), unit(edge.curve.direction(0.0)), cross_threshold) {
                    corners.push((ci, ei));
                }
                prev_direction = edge.curve.direction(1.0);
            }
        }
        corners
    }
}

/// Whether two unit directions meet at a corner for the given
/// `sin(angle_threshold)`.
pub fn is_corner(a_dir: DVec2, b_dir: DVec2, cross_threshold: f64) -> bool {
    a_dir.dot(b_dir) <= 0.0 || a_dir.perp_dot(b_dir).abs() > cross_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(clockwise: bool) -> GlyphOutline {
        let mut outline = GlyphOutline::new(1.0);
        if clockwise {
            outline.add_rect(0.0, 0.0, 1.0, 1.0);
        } else {
            outline
                .move_to(0.0, 0.0)
                .line_to(1.0, 0.0)
                .line_to(1.0, 1.0)
                .line_to(0.0, 1.0)
                .close();
        }
        outline
    }

    #[test]
    fn test_from_outline_closes_contour() {
        let shape = Shape::from_outline(&square(true));
        assert_eq!(shape.contours.len(), 1);
        assert_eq!(shape.contours[0].edges.len(), 4);
        let edges = &shape.contours[0].edges;
        assert_eq!(edges[3].curve.end(), edges[0].curve.start());
    }

    #[test]
    fn test_winding_sign() {
        assert_eq!(Shape::from_outline(&square(true)).contours[0].winding(), 1);
        assert_eq!(Shape::from_outline(&square(false)).contours[0].winding(), -1);
    }

    #[test]
    fn test_normalize_orients_either_winding() {
        for clockwise in [true, false] {
            let mut shape = Shape::from_outline(&square(clockwise));
            shape.normalize();
            // Center of the square must read as inside (positive)
            let center = DVec2::new(0.5, 0.5);
            let mut min = SignedDistance::INFINITE;
            for edge in &shape.contours[0].edges {
                let (d, _) = edge.curve.signed_distance(center);
                if d.closer_than(&min) {
                    min = d;
                }
            }
            assert!(min.distance > 0.0, "clockwise={clockwise}");
        }
    }

    #[test]
    fn test_normalize_drops_degenerate_contours() {
        let mut outline = square(true);
        // A contour that goes out and back encloses no area
        outline.move_to(2.0, 2.0).line_to(3.0, 2.0).close();
        let mut shape = Shape::from_outline(&outline);
        let diagnostics = shape.normalize();
        assert_eq!(diagnostics.degenerate_contours, 1);
        assert_eq!(shape.contours.len(), 1);
    }

    #[test]
    fn test_curved_contour_with_collinear_end_points_keeps_area() {
        // On-curve points all lie on x = 0; the quadratics bulge to the right
        let mut outline = GlyphOutline::new(1.0);
        outline
            .move_to(0.0, 0.0)
            .line_to(0.0, 2.0)
            .quad_to(2.0, 2.0, 0.0, 1.0)
            .quad_to(2.0, 0.0, 0.0, 0.0)
            .close();
        let mut shape = Shape::from_outline(&outline);
        assert_ne!(shape.contours[0].winding(), 0);

        let diagnostics = shape.normalize();
        assert_eq!(diagnostics.degenerate_contours, 0);
        assert_eq!(shape.contours.len(), 1);
        assert!(shape.bounds().has_area());
    }

    #[test]
    fn test_normalize_splits_single_edge_contour() {
        let mut outline = GlyphOutline::new(1.0);
        outline
            .move_to(0.0, 0.0)
            .curve_to(-1.0, 2.0, 2.0, 2.0, 0.0, 0.0)
            .close();
        let mut shape = Shape::from_outline(&outline);
        shape.normalize();
        assert_eq!(shape.contours[0].edges.len(), 3);
    }

    #[test]
    fn test_square_has_four_corners() {
        let shape = Shape::from_outline(&square(true));
        assert_eq!(shape.corners(3.0).len(), 4);
    }

    #[test]
    fn test_miters_extend_bounds() {
        let shape = Shape::from_outline(&square(true));
        let mut bounds = shape.bounds();
        shape.bound_miters(&mut bounds, 0.1, 2.0, 1);
        assert!(bounds.left < 0.0);
        assert!(bounds.top > 1.0);
    }
}
