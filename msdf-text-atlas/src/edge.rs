//! Edge segments and signed distance queries.

use glam::DVec2;

use crate::color::EdgeColor;
use crate::equation::{solve_cubic, solve_quadratic};

const CUBIC_SEARCH_STARTS: usize = 4;
const CUBIC_SEARCH_STEPS: usize = 4;
const LENGTH_ESTIMATE_STEPS: usize = 4;

/// Unit vector, or `(0, 1)` for the zero vector.
pub(crate) fn unit(v: DVec2) -> DVec2 {
    let len = v.length();
    if len == 0.0 {
        DVec2::new(0.0, 1.0)
    } else {
        v / len
    }
}

/// Unit normal pointing to the right of `v`.
fn orthonormal(v: DVec2) -> DVec2 {
    let len = v.length();
    if len == 0.0 {
        DVec2::new(0.0, -1.0)
    } else {
        DVec2::new(v.y / len, -v.x / len)
    }
}

fn non_zero_sign(n: f64) -> f64 {
    if n > 0.0 { 1.0 } else { -1.0 }
}

fn cross(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b)
}

/// Distance to an edge, with the angle term used to break ties between
/// edges that meet at a shared endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedDistance {
    pub distance: f64,
    pub dot: f64,
}

impl SignedDistance {
    pub const INFINITE: SignedDistance = SignedDistance {
        distance: -f64::MAX,
        dot: 0.0,
    };

    pub fn new(distance: f64, dot: f64) -> Self {
        Self { distance, dot }
    }

    /// Whether `self` is strictly closer than `other`
    pub fn closer_than(&self, other: &SignedDistance) -> bool {
        let (a, b) = (self.distance.abs(), other.distance.abs());
        a < b || (a == b && self.dot < other.dot)
    }
}

impl Default for SignedDistance {
    fn default() -> Self {
        Self::INFINITE
    }
}

/// Axis-aligned bounds in shape units. Empty bounds are inverted infinities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        left: f64::INFINITY,
        bottom: f64::INFINITY,
        right: f64::NEG_INFINITY,
        top: f64::NEG_INFINITY,
    };

    pub fn include(&mut self, p: DVec2) {
        self.left = self.left.min(p.x);
        self.bottom = self.bottom.min(p.y);
        self.right = self.right.max(p.x);
        self.top = self.top.max(p.y);
    }

    /// True when the bounds enclose a positive area
    pub fn has_area(&self) -> bool {
        self.left < self.right && self.bottom < self.top
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.bottom.is_finite() && self.right.is_finite() && self.top.is_finite()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Geometry of one edge: a line or a quadratic/cubic Bézier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear([DVec2; 2]),
    Quadratic([DVec2; 3]),
    Cubic([DVec2; 4]),
}

impl Curve {
    pub fn start(&self) -> DVec2 {
        match self {
            Curve::Linear(p) => p[0],
            Curve::Quadratic(p) => p[0],
            Curve::Cubic(p) => p[0],
        }
    }

    pub fn end(&self) -> DVec2 {
        match self {
            Curve::Linear(p) => p[1],
            Curve::Quadratic(p) => p[2],
            Curve::Cubic(p) => p[3],
        }
    }

    fn control_points(&self) -> &[DVec2] {
        match self {
            Curve::Linear(p) => p,
            Curve::Quadratic(p) => p,
            Curve::Cubic(p) => p,
        }
    }

    /// True when every control point coincides
    pub fn is_degenerate(&self) -> bool {
        let points = self.control_points();
        points.iter().all(|p| *p == points[0])
    }

    /// True when any coordinate is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.control_points().iter().all(|p| p.is_finite())
    }

    pub fn point(&self, t: f64) -> DVec2 {
        match *self {
            Curve::Linear([p0, p1]) => p0.lerp(p1, t),
            Curve::Quadratic([p0, p1, p2]) => p0.lerp(p1, t).lerp(p1.lerp(p2, t), t),
            Curve::Cubic([p0, p1, p2, p3]) => {
                let p12 = p1.lerp(p2, t);
                p0.lerp(p1, t)
                    .lerp(p12, t)
                    .lerp(p12.lerp(p2.lerp(p3, t), t), t)
            }
        }
    }

    /// Tangent direction (not normalized) at parameter `t`
    pub fn direction(&self, t: f64) -> DVec2 {
        match *self {
            Curve::Linear([p0, p1]) => p1 - p0,
            Curve::Quadratic([p0, p1, p2]) => {
                let tangent = (p1 - p0).lerp(p2 - p1, t);
                if tangent == DVec2::ZERO {
                    p2 - p0
                } else {
                    tangent
                }
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                let tangent = (p1 - p0)
                    .lerp(p2 - p1, t)
                    .lerp((p2 - p1).lerp(p3 - p2, t), t);
                if tangent == DVec2::ZERO {
                    if t == 0.0 {
                        return p2 - p0;
                    }
                    if t == 1.0 {
                        return p3 - p1;
                    }
                }
                tangent
            }
        }
    }

    /// Signed distance from `origin` to the curve and the curve parameter of
    /// the closest point (which may lie outside `[0, 1]` for endpoints).
    pub fn signed_distance(&self, origin: DVec2) -> (SignedDistance, f64) {
        match *self {
            Curve::Linear([p0, p1]) => {
                let aq = origin - p0;
                let ab = p1 - p0;
                let param = aq.dot(ab) / ab.dot(ab);
                let eq = (if param > 0.5 { p1 } else { p0 }) - origin;
                let endpoint_distance = eq.length();
                if param > 0.0 && param < 1.0 {
                    let ortho_distance = orthonormal(ab).dot(aq);
                    if ortho_distance.abs() < endpoint_distance {
                        return (SignedDistance::new(ortho_distance, 0.0), param);
                    }
                }
                (
                    SignedDistance::new(
                        non_zero_sign(cross(aq, ab)) * endpoint_distance,
                        unit(ab).dot(unit(eq)).abs(),
                    ),
                    param,
                )
            }
            Curve::Quadratic([p0, p1, p2]) => {
                let qa = p0 - origin;
                let ab = p1 - p0;
                let br = p2 - p1 - ab;
                let a = br.dot(br);
                let b = 3.0 * ab.dot(br);
                let c = 2.0 * ab.dot(ab) + qa.dot(br);
                let d = qa.dot(ab);
                let roots = solve_cubic(a, b, c, d);

                let mut ep_dir = self.direction(0.0);
                let mut min_distance = non_zero_sign(cross(ep_dir, qa)) * qa.length();
                let mut param = -qa.dot(ep_dir) / ep_dir.dot(ep_dir);
                {
                    ep_dir = self.direction(1.0);
                    let distance = (p2 - origin).length();
                    if distance < min_distance.abs() {
                        min_distance = non_zero_sign(cross(ep_dir, p2 - origin)) * distance;
                        param = (origin - p1).dot(ep_dir) / ep_dir.dot(ep_dir);
                    }
                }
                for &t in roots.as_slice() {
                    if t > 0.0 && t < 1.0 {
                        let qe = qa + 2.0 * t * ab + t * t * br;
                        let distance = qe.length();
                        if distance <= min_distance.abs() {
                            min_distance = non_zero_sign(cross(ab + t * br, qe)) * distance;
                            param = t;
                        }
                    }
                }
                (self.finish_distance(min_distance, param, origin), param)
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                let qa = p0 - origin;
                let ab = p1 - p0;
                let br = p2 - p1 - ab;
                let as_ = (p3 - p2) - (p2 - p1) - br;

                let mut ep_dir = self.direction(0.0);
                let mut min_distance = non_zero_sign(cross(ep_dir, qa)) * qa.length();
                let mut param = -qa.dot(ep_dir) / ep_dir.dot(ep_dir);
                {
                    ep_dir = self.direction(1.0);
                    let distance = (p3 - origin).length();
                    if distance < min_distance.abs() {
                        min_distance = non_zero_sign(cross(ep_dir, p3 - origin)) * distance;
                        param = (ep_dir - (p3 - origin)).dot(ep_dir) / ep_dir.dot(ep_dir);
                    }
                }
                // Newton iterations from evenly spaced starting parameters
                for i in 0..=CUBIC_SEARCH_STARTS {
                    let mut t = i as f64 / CUBIC_SEARCH_STARTS as f64;
                    let mut qe = qa + 3.0 * t * ab + 3.0 * t * t * br + t * t * t * as_;
                    for _ in 0..CUBIC_SEARCH_STEPS {
                        let d1 = 3.0 * ab + 6.0 * t * br + 3.0 * t * t * as_;
                        let d2 = 6.0 * br + 6.0 * t * as_;
                        t -= qe.dot(d1) / (d1.dot(d1) + qe.dot(d2));
                        if t <= 0.0 || t >= 1.0 {
                            break;
                        }
                        qe = qa + 3.0 * t * ab + 3.0 * t * t * br + t * t * t * as_;
                        let distance = qe.length();
                        if distance < min_distance.abs() {
                            min_distance = non_zero_sign(cross(self.direction(t), qe)) * distance;
                            param = t;
                        }
                    }
                }
                (self.finish_distance(min_distance, param, origin), param)
            }
        }
    }

    fn finish_distance(&self, min_distance: f64, param: f64, origin: DVec2) -> SignedDistance {
        if (0.0..=1.0).contains(&param) {
            SignedDistance::new(min_distance, 0.0)
        } else if param < 0.5 {
            SignedDistance::new(
                min_distance,
                unit(self.direction(0.0))
                    .dot(unit(self.start() - origin))
                    .abs(),
            )
        } else {
            SignedDistance::new(
                min_distance,
                unit(self.direction(1.0))
                    .dot(unit(self.end() - origin))
                    .abs(),
            )
        }
    }

    /// Replace an endpoint distance with the distance to the tangent line
    /// extended past that endpoint, when it is not farther.
    pub fn distance_to_pseudo_distance(
        &self,
        distance: &mut SignedDistance,
        origin: DVec2,
        param: f64,
    ) {
        if param < 0.0 {
            let dir = unit(self.direction(0.0));
            let aq = origin - self.point(0.0);
            let ts = aq.dot(dir);
            if ts < 0.0 {
                let pseudo_distance = cross(aq, dir);
                if pseudo_distance.abs() <= distance.distance.abs() {
                    distance.distance = pseudo_distance;
                    distance.dot = 0.0;
                }
            }
        } else if param > 1.0 {
            let dir = unit(self.direction(1.0));
            let bq = origin - self.point(1.0);
            let ts = bq.dot(dir);
            if ts > 0.0 {
                let pseudo_distance = cross(bq, dir);
                if pseudo_distance.abs() <= distance.distance.abs() {
                    distance.distance = pseudo_distance;
                    distance.dot = 0.0;
                }
            }
        }
    }

    /// Extend `bounds` to cover the curve including interior extrema
    pub fn bound(&self, bounds: &mut Bounds) {
        bounds.include(self.start());
        bounds.include(self.end());
        match *self {
            Curve::Linear(_) => {}
            Curve::Quadratic([p0, p1, p2]) => {
                let bot = (p1 - p0) - (p2 - p1);
                if bot.x != 0.0 {
                    let t = (p1.x - p0.x) / bot.x;
                    if t > 0.0 && t < 1.0 {
                        bounds.include(self.point(t));
                    }
                }
                if bot.y != 0.0 {
                    let t = (p1.y - p0.y) / bot.y;
                    if t > 0.0 && t < 1.0 {
                        bounds.include(self.point(t));
                    }
                }
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                let a0 = p1 - p0;
                let a1 = 2.0 * (p2 - p1 - a0);
                let a2 = p3 - 3.0 * p2 + 3.0 * p1 - p0;
                for roots in [
                    solve_quadratic(a2.x, a1.x, a0.x),
                    solve_quadratic(a2.y, a1.y, a0.y),
                ] {
                    for &t in roots.as_slice() {
                        if t > 0.0 && t < 1.0 {
                            bounds.include(self.point(t));
                        }
                    }
                }
            }
        }
    }

    pub fn reversed(&self) -> Curve {
        match *self {
            Curve::Linear([p0, p1]) => Curve::Linear([p1, p0]),
            Curve::Quadratic([p0, p1, p2]) => Curve::Quadratic([p2, p1, p0]),
            Curve::Cubic([p0, p1, p2, p3]) => Curve::Cubic([p3, p2, p1, p0]),
        }
    }

    /// De Casteljau subdivision at `t`
    pub fn split_at(&self, t: f64) -> (Curve, Curve) {
        match *self {
            Curve::Linear([p0, p1]) => {
                let m = p0.lerp(p1, t);
                (Curve::Linear([p0, m]), Curve::Linear([m, p1]))
            }
            Curve::Quadratic([p0, p1, p2]) => {
                let a = p0.lerp(p1, t);
                let b = p1.lerp(p2, t);
                let m = a.lerp(b, t);
                (Curve::Quadratic([p0, a, m]), Curve::Quadratic([m, b, p2]))
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                let a = p0.lerp(p1, t);
                let b = p1.lerp(p2, t);
                let c = p2.lerp(p3, t);
                let ab = a.lerp(b, t);
                let bc = b.lerp(c, t);
                let m = ab.lerp(bc, t);
                (Curve::Cubic([p0, a, ab, m]), Curve::Cubic([m, bc, c, p3]))
            }
        }
    }

    pub fn split_in_thirds(&self) -> [Curve; 3] {
        let (first, rest) = self.split_at(1.0 / 3.0);
        let (second, third) = rest.split_at(0.5);
        [first, second, third]
    }

    /// Polyline length approximation
    pub fn estimate_length(&self) -> f64 {
        let mut length = 0.0;
        let mut prev = self.point(0.0);
        for i in 1..=LENGTH_ESTIMATE_STEPS {
            let cur = self.point(i as f64 / LENGTH_ESTIMATE_STEPS as f64);
            length += (cur - prev).length();
            prev = cur;
        }
        length
    }
}

/// A colored edge of a contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSegment {
    pub curve: Curve,
    pub color: EdgeColor,
}

impl EdgeSegment {
    pub fn new(curve: Curve) -> Self {
        Self {
            curve,
            color: EdgeColor::WHITE,
        }
    }

    pub fn linear(p0: DVec2, p1: DVec2) -> Self {
        Self::new(Curve::Linear([p0, p1]))
    }

    /// Quadratic edge; collapses to a line when the control point sits on an
    /// endpoint.
    pub fn quadratic(p0: DVec2, p1: DVec2, p2: DVec2) -> Self {
        if p1 == p0 || p1 == p2 {
            Self::linear(p0, p2)
        } else {
            Self::new(Curve::Quadratic([p0, p1, p2]))
        }
    }

    /// Cubic edge; collapses to a quadratic or line when control points are
    /// redundant.
    pub fn cubic(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2) -> Self {
        if (p1 == p0 || p1 == p3) && (p2 == p0 || p2 == p3) {
            Self::linear(p0, p3)
        } else {
            Self::new(Curve::Cubic([p0, p1, p2, p3]))
        }
    }

    pub fn with_color(mut self, color: EdgeColor) -> Self {
        self.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    #[test]
    fn test_linear_distance_perpendicular() {
        let line = Curve::Linear([v(0.0, 0.0), v(2.0, 0.0)]);
        let (above, param) = line.signed_distance(v(1.0, 1.0));
        let (below, _) = line.signed_distance(v(1.0, -1.0));
        assert!((param - 0.5).abs() < 1e-12);
        assert!((above.distance.abs() - 1.0).abs() < 1e-12);
        assert_eq!(above.distance.signum(), -below.distance.signum());
    }

    #[test]
    fn test_linear_distance_endpoint() {
        let line = Curve::Linear([v(0.0, 0.0), v(1.0, 0.0)]);
        let (d, param) = line.signed_distance(v(2.0, 0.0));
        assert!(param > 1.0);
        assert!((d.distance.abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_quadratic_distance_matches_sampling() {
        let curve = Curve::Quadratic([v(0.0, 0.0), v(1.0, 2.0), v(2.0, 0.0)]);
        let origin = v(1.0, 0.2);
        let (d, _) = curve.signed_distance(origin);
        let sampled = (0..=10_000)
            .map(|i| (curve.point(i as f64 / 10_000.0) - origin).length())
            .fold(f64::MAX, f64::min);
        assert!((d.distance.abs() - sampled).abs() < 1e-4);
    }

    #[test]
    fn test_cubic_distance_matches_sampling() {
        let curve = Curve::Cubic([v(0.0, 0.0), v(0.0, 1.0), v(1.0, 1.0), v(1.0, 0.0)]);
        let origin = v(0.5, 0.4);
        let (d, _) = curve.signed_distance(origin);
        let sampled = (0..=10_000)
            .map(|i| (curve.point(i as f64 / 10_000.0) - origin).length())
            .fold(f64::MAX, f64::min);
        assert!((d.distance.abs() - sampled).abs() < 1e-4);
    }

    #[test]
    fn test_split_in_thirds_is_continuous() {
        let curve = Curve::Cubic([v(0.0, 0.0), v(0.0, 1.0), v(1.0, 1.0), v(1.0, 0.0)]);
        let [a, b, c] = curve.split_in_thirds();
        assert_eq!(a.start(), curve.start());
        assert!((a.end() - curve.point(1.0 / 3.0)).length() < 1e-12);
        assert_eq!(a.end(), b.start());
        assert_eq!(b.end(), c.start());
        assert!((b.end() - curve.point(2.0 / 3.0)).length() < 1e-12);
        assert_eq!(c.end(), curve.end());
    }

    #[test]
    fn test_quadratic_bounds_include_extremum() {
        let curve = Curve::Quadratic([v(0.0, 0.0), v(1.0, 2.0), v(2.0, 0.0)]);
        let mut bounds = Bounds::EMPTY;
        curve.bound(&mut bounds);
        assert!((bounds.top - 1.0).abs() < 1e-12);
        assert_eq!(bounds.left, 0.0);
        assert_eq!(bounds.right, 2.0);
    }

    #[test]
    fn test_signed_distance_ordering() {
        let near = SignedDistance::new(-0.5, 0.3);
        let far = SignedDistance::new(1.0, 0.0);
        let tie = SignedDistance::new(0.5, 0.1);
        assert!(near.closer_than(&far));
        assert!(tie.closer_than(&near));
        assert!(near.closer_than(&SignedDistance::INFINITE));
    }

    #[test]
    fn test_quadratic_constructor_collapses_to_line() {
        let edge = EdgeSegment::quadratic(v(0.0, 0.0), v(0.0, 0.0), v(1.0, 1.0));
        assert!(matches!(edge.curve, Curve::Linear(_)));
    }
}
